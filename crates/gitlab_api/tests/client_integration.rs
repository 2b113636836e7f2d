//! Integration tests over the crate's public surface: configuration,
//! routing decisions and entity decoding as a consumer sees them.

use gitlab_api::{
    AccessLevel, ApiError, ClientConfig, GitLabApiClient, Group, ProxyConfig, Route, RoutePlanner,
    Session, User,
};

fn proxy_with_patterns(patterns: &[&str]) -> ProxyConfig {
    ProxyConfig::new("proxy.example.com", 8080)
        .with_excluded_hosts(patterns.iter().map(|p| p.to_string()).collect())
}

#[test]
fn excluded_hosts_bypass_the_proxy_on_every_call() {
    let planner = RoutePlanner::new(&proxy_with_patterns(&[
        r".*\.sonyericsson\.net",
        r"localhost",
    ]))
    .expect("patterns compile");

    for _ in 0..3 {
        assert_eq!(planner.route("seld.sonyericsson.net"), Route::Direct);
        assert_eq!(planner.route("localhost"), Route::Direct);
        assert_eq!(
            planner.route("gitlab.com"),
            Route::Proxy {
                host: "proxy.example.com".to_string(),
                port: 8080,
            }
        );
    }
}

#[test]
fn exclusion_patterns_never_match_substrings() {
    let planner =
        RoutePlanner::new(&proxy_with_patterns(&["internal"])).expect("patterns compile");

    assert!(matches!(
        planner.route("internal.example.com"),
        Route::Proxy { .. }
    ));
    assert_eq!(planner.route("internal"), Route::Direct);
}

#[test]
fn client_construction_rejects_bad_exclusion_patterns() {
    let config = ClientConfig::new("https://gitlab.example.com", "token")
        .with_proxy(proxy_with_patterns(&["*.example.com"]));

    let err = GitLabApiClient::new(config)
        .err()
        .expect("invalid pattern should be rejected");
    assert!(matches!(err, ApiError::Configuration(_)));
}

#[test]
fn clients_with_distinct_proxy_configs_are_independent() {
    let proxied = ClientConfig::new("https://gitlab.example.com", "token")
        .with_proxy(proxy_with_patterns(&[r".*\.internal"]));
    let direct = ClientConfig::new("https://gitlab.example.com", "token");

    // Each construction owns its transport; building one client must not
    // disturb another already built.
    let first = GitLabApiClient::new(proxied).expect("proxied client");
    let second = GitLabApiClient::new(direct).expect("direct client");
    assert!(first.config().proxy.is_some());
    assert!(second.config().proxy.is_none());
}

#[test]
fn access_levels_round_trip_and_reject_unknown_codes() {
    for id in [0, 10, 20, 30, 40, 50] {
        let level = AccessLevel::from_id(id).expect("known code");
        assert_eq!(level.id(), id);
    }
    assert!(matches!(
        AccessLevel::from_id(17),
        Err(ApiError::InvalidData(_))
    ));
}

#[test]
fn entities_decode_from_documented_payloads() {
    let user: User = serde_json::from_str(
        r#"{
            "id": 1,
            "username": "username",
            "email": "user@example.com",
            "name": "User Name",
            "created_at": "2010-01-06T08:20:00.000Z",
            "state": "active",
            "is_admin": false
        }"#,
    )
    .expect("user decodes");
    assert_eq!(user.id, 1);
    assert!(user.is_active());
    assert_eq!(user.is_blocked(), !user.is_active());

    let session: Session = serde_json::from_str(
        r#"{
            "id": 1,
            "username": "bob",
            "email": "bob@x.com",
            "name": "Bob",
            "private_token": "abc123",
            "blocked": false
        }"#,
    )
    .expect("session decodes");
    assert_eq!(session.private_token, "abc123");
    assert!(!session.is_blocked());

    let group: Group =
        serde_json::from_str(r#"{"id": 7, "name": "Green Group", "path": "greengroup"}"#)
            .expect("group decodes");
    assert_eq!(group.name, "Green Group");
}

#[test]
fn entities_never_default_missing_required_fields() {
    assert!(serde_json::from_str::<User>(r#"{"id": 1}"#).is_err());
    assert!(serde_json::from_str::<Session>(r#"{"id": 1}"#).is_err());
    assert!(serde_json::from_str::<Group>(r#"{"id": 1}"#).is_err());
}

#[tokio::test]
async fn test_connection_surfaces_connection_failures() {
    // An unroutable scheme-less host fails in the transport, never reaching
    // a server; the error must be a connection failure, not a panic.
    let config = ClientConfig::new("http://invalid.invalid", "token")
        .with_timeout(std::time::Duration::from_millis(250));

    match GitLabApiClient::test_connection(config).await {
        Err(ApiError::Connection(_)) => {}
        other => panic!("expected connection failure, got {other:?}"),
    }
}

//! API client: request construction, dispatch and response decoding.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::classify::{classify, Expectation};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::impersonate::ImpersonatingClient;
use crate::models::{Group, GroupMember, GroupMemberPayload, Session, User};

/// Path prefix of the API below the configured host.
const API_PREFIX: &str = "/api/v3";

/// Request fields, keyed by name.
///
/// GET fields become query parameters, POST fields a form body. Merging is
/// last-write-wins by key: the private token is merged after the caller's
/// fields, a decorator's fields before them.
pub type Fields = BTreeMap<String, String>;

/// An API request before field merging and encoding.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API prefix, e.g. `/users/42`.
    pub path: String,
    pub fields: Fields,
    /// Whether the private token is merged into the fields before
    /// transmission. Off only for the session exchange itself.
    pub attach_token: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            fields: Fields::new(),
            attach_token: true,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            fields: Fields::new(),
            attach_token: true,
        }
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn without_token(mut self) -> Self {
        self.attach_token = false;
        self
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|err| ApiError::invalid_data(err.to_string()))
}

/// The request capability shared by the base client and its decorators.
///
/// `dispatch` is the seam: it issues one request and returns the raw
/// response, before status classification. Decorators wrap it to rewrite
/// the outgoing fields or reinterpret the raw response; every operation
/// below is defined in terms of it and therefore works through any
/// decorator unchanged.
#[async_trait]
pub trait GitLabApi: Send + Sync {
    /// Issue a request and return the raw response.
    async fn dispatch(&self, request: ApiRequest) -> Result<HttpResponse, ApiError>;

    /// Opens a session with user credentials.
    ///
    /// This is the one call that does not attach a private token; it is how
    /// a token is obtained in the first place.
    async fn open_session(&self, login: &str, password: &str) -> Result<Session, ApiError> {
        let request = ApiRequest::post("/session")
            .field("login", login)
            .field("password", password)
            .without_token();
        let response = self.dispatch(request).await?;
        classify(Expectation::Created, &response)?;
        decode(&response)
    }

    /// Returns the user owning the private token.
    async fn get_current_user(&self) -> Result<User, ApiError> {
        let response = self.dispatch(ApiRequest::get("/user")).await?;
        classify(Expectation::Ok, &response)?;
        decode(&response)
    }

    /// Returns the user with a specific user ID.
    async fn get_user(&self, user_id: u64) -> Result<User, ApiError> {
        let request = ApiRequest::get(format!("/users/{user_id}"));
        let response = self.dispatch(request).await?;
        classify(Expectation::Ok, &response).map_err(|err| match err {
            ApiError::NotFound => ApiError::UserNotFound(user_id),
            other => other,
        })?;
        decode(&response)
    }

    /// Fetches all users visible to the authenticated user.
    ///
    /// Every element of the response array is decoded; one malformed
    /// element fails the whole call, there are no partial results.
    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self.dispatch(ApiRequest::get("/users")).await?;
        classify(Expectation::Ok, &response)?;
        decode(&response)
    }

    /// Fetches the groups the authenticated user can see.
    ///
    /// Admin users see all groups, others only groups they are members of.
    async fn get_groups(&self) -> Result<Vec<Group>, ApiError> {
        let response = self.dispatch(ApiRequest::get("/groups")).await?;
        classify(Expectation::Ok, &response)?;
        decode(&response)
    }

    /// Returns the group with a specific group ID.
    async fn get_group(&self, group_id: u64) -> Result<Group, ApiError> {
        let request = ApiRequest::get(format!("/groups/{group_id}"));
        let response = self.dispatch(request).await?;
        classify(Expectation::Ok, &response).map_err(|err| match err {
            ApiError::NotFound => ApiError::GroupNotFound(group_id),
            other => other,
        })?;
        decode(&response)
    }

    /// Fetches the members of a group.
    ///
    /// The membership payload does not carry the group ID, so each member
    /// entity receives it from this call.
    async fn get_group_members(&self, group_id: u64) -> Result<Vec<GroupMember>, ApiError> {
        let request = ApiRequest::get(format!("/groups/{group_id}/members"));
        let response = self.dispatch(request).await?;
        classify(Expectation::Ok, &response).map_err(|err| match err {
            ApiError::NotFound => ApiError::GroupNotFound(group_id),
            other => other,
        })?;
        let payloads: Vec<GroupMemberPayload> = decode(&response)?;
        Ok(payloads
            .into_iter()
            .map(|payload| GroupMember::from_payload(payload, group_id))
            .collect())
    }
}

/// A client for communicating with a GitLab API.
///
/// Cloning is cheap and clones share the same transport, configuration and
/// route decision cache. Clients with different configurations own fully
/// separate transports and never affect each other.
#[derive(Clone)]
pub struct GitLabApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl GitLabApiClient {
    /// Creates a client from its configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub(crate) fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Opens a session with user credentials and returns a client
    /// authenticated with the session's private token.
    ///
    /// Any token already present in `config` is ignored for the exchange.
    pub async fn from_session(
        config: ClientConfig,
        login: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        let bootstrap = Self::new(ClientConfig {
            private_token: None,
            ..config.clone()
        })?;
        let session = bootstrap.open_session(login, password).await?;
        Self::new(ClientConfig {
            private_token: Some(session.private_token),
            ..config
        })
    }

    /// Tests whether a connection can be established with `config` by
    /// fetching the authenticated user with a throwaway client.
    ///
    /// Errors propagate unchanged; a successful result is discarded.
    pub async fn test_connection(config: ClientConfig) -> Result<(), ApiError> {
        Self::new(config)?.get_current_user().await.map(|_| ())
    }

    /// Returns a client performing every request as the given user.
    ///
    /// The impersonated requests have the same access as that user;
    /// impersonation requires the private token of an administrator.
    /// Constructing the impersonating client performs no I/O.
    #[must_use]
    pub fn as_user(&self, user_id: u64) -> ImpersonatingClient {
        ImpersonatingClient::new(self.clone(), user_id)
    }

    /// The URL of the host server, excluding the API path.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// The private token, if one is configured.
    #[must_use]
    pub fn private_token(&self) -> Option<&str> {
        self.config.private_token.as_deref()
    }

    /// The configuration the client was built from.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Merges the token into the field set and encodes the request.
    fn encode(&self, request: ApiRequest) -> HttpRequest {
        let mut fields = request.fields;
        if request.attach_token {
            if let Some(token) = &self.config.private_token {
                fields.insert("private_token".to_string(), token.clone());
            }
        }

        let base = format!(
            "{}{API_PREFIX}{}",
            self.config.host.trim_end_matches('/'),
            request.path
        );

        match request.method {
            HttpMethod::Get => {
                let url = if fields.is_empty() {
                    base
                } else {
                    format!("{base}?{}", encode_fields(&fields))
                };
                HttpRequest {
                    method: HttpMethod::Get,
                    url,
                    headers: Vec::new(),
                    body: Vec::new(),
                }
            }
            HttpMethod::Post => HttpRequest {
                method: HttpMethod::Post,
                url: base,
                headers: vec![(
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                )],
                body: encode_fields(&fields).into_bytes(),
            },
        }
    }
}

#[async_trait]
impl GitLabApi for GitLabApiClient {
    async fn dispatch(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let encoded = self.encode(request);
        tracing::debug!(
            method = encoded.method.as_str(),
            url = %encoded.url,
            "dispatching API request"
        );
        self.transport.send(encoded).await.map_err(|err| {
            tracing::warn!(error = %err, "transport failure");
            ApiError::from(err)
        })
    }
}

fn encode_fields(fields: &Fields) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

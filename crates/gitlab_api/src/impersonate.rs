//! Acting on behalf of another user.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::client::{ApiRequest, GitLabApi, GitLabApiClient};
use crate::error::ApiError;
use crate::http::HttpResponse;

/// Error message the server sends when the `sudo` target does not exist.
///
/// External contract: this is a literal match against upstream wording and
/// breaks if upstream rewords the message.
fn user_not_found_message() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("^404.* No user id or username for: .*$").expect("literal pattern compiles")
    })
}

/// A client performing every request as another user.
///
/// Wraps a [`GitLabApiClient`] by composition: each dispatched request gets
/// a `sudo` field carrying the impersonated user's ID before delegation,
/// and each raw response is inspected for the server's "no such user" 404
/// before normal classification. Impersonation requires the wrapped client
/// to be authenticated as an administrator.
#[derive(Clone)]
pub struct ImpersonatingClient {
    inner: GitLabApiClient,
    user_id: u64,
}

impl ImpersonatingClient {
    pub(crate) fn new(inner: GitLabApiClient, user_id: u64) -> Self {
        Self { inner, user_id }
    }

    /// The user ID of the impersonated user.
    #[must_use]
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Checks whether a raw response reports the impersonated user as
    /// missing.
    ///
    /// Only a 404 whose JSON body has a `message` field matching the known
    /// wording counts; anything else falls through to normal
    /// classification.
    fn check_user_not_found(&self, response: &HttpResponse) -> Result<(), ApiError> {
        if response.status != 404 {
            return Ok(());
        }
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&response.body) else {
            return Ok(());
        };
        match body.get("message").and_then(|message| message.as_str()) {
            Some(message) if user_not_found_message().is_match(message) => {
                Err(ApiError::UserNotFound(self.user_id))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl GitLabApi for ImpersonatingClient {
    async fn dispatch(&self, mut request: ApiRequest) -> Result<HttpResponse, ApiError> {
        request
            .fields
            .insert("sudo".to_string(), self.user_id.to_string());
        let response = self.inner.dispatch(request).await?;
        self.check_user_not_found(&response)?;
        Ok(response)
    }
}

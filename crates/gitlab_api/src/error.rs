//! API error taxonomy.

use thiserror::Error;

use crate::http::HttpError;

/// Errors surfaced by API operations.
///
/// `GroupNotFound` and `UserNotFound` are refinements of a generic 404,
/// raised by the operation that knows which resource was asked for; the
/// status classifier itself only ever produces `NotFound` and
/// `Authentication`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached at all (DNS, connect, TLS, IO).
    #[error("could not connect to the API: {0}")]
    Connection(String),

    /// The server answered with an unexpected, non-404 status.
    ///
    /// A bad token, a server error and any other unexpected status all
    /// land here.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The requested resource does not exist (plain 404).
    #[error("resource not found")]
    NotFound,

    /// No group exists with the given group ID.
    #[error("a group with group ID {0} does not exist")]
    GroupNotFound(u64),

    /// No user exists with the given user ID.
    ///
    /// Raised both when a user lookup 404s and when impersonating a
    /// nonexistent user.
    #[error("a user with user ID {0} does not exist")]
    UserNotFound(u64),

    /// A response body could not be decoded into the expected entity.
    ///
    /// This is invalid input data, not a failed request: it is raised while
    /// constructing an entity from a body the server already delivered.
    #[error("invalid response data: {0}")]
    InvalidData(String),

    /// The client configuration was rejected at construction.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create an invalid-data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check whether this error is any of the not-found variants.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::GroupNotFound(_) | Self::UserNotFound(_)
        )
    }
}

/// Transport failures never reached the server.
impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_are_recognized() {
        assert!(ApiError::NotFound.is_not_found());
        assert!(ApiError::GroupNotFound(7).is_not_found());
        assert!(ApiError::UserNotFound(42).is_not_found());
        assert!(!ApiError::Connection("refused".to_string()).is_not_found());
        assert!(!ApiError::authentication("bad token").is_not_found());
    }

    #[test]
    fn refined_not_found_messages_name_the_id() {
        assert!(ApiError::UserNotFound(42).to_string().contains("42"));
        assert!(ApiError::GroupNotFound(7).to_string().contains('7'));
    }

    #[test]
    fn transport_errors_become_connection_failures() {
        let err: ApiError = HttpError::Transport("connection refused".to_string()).into();
        match err {
            ApiError::Connection(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

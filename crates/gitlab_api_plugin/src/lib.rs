//! Host-platform configuration layer for the GitLab API client.
//!
//! Stores the connection settings (server URL, private token, proxy), and
//! exposes one lazily built, connection-tested [`GitLabApiClient`] shared
//! across the process. Changing any setting invalidates the cached client.
//!
//! # Example
//!
//! ```ignore
//! use gitlab_api_plugin::GitLabConfiguration;
//!
//! let mut configuration = GitLabConfiguration::shared().lock().await;
//! if configuration.is_configured() {
//!     let client = configuration.client().await?;
//!     let user = client.get_current_user().await?;
//! }
//! ```

use thiserror::Error;

mod plugin;
mod settings;

pub use gitlab_api::GitLabApiClient;
pub use plugin::{check_connection, GitLabConfiguration, Validation};
pub use settings::{ProxySettings, Settings};

/// Errors raised by the configuration layer.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The stored settings could not be loaded or parsed.
    #[error("could not load settings: {0}")]
    Settings(String),

    /// Server URL or private token are missing.
    #[error("the server URL and private token are not configured")]
    NotConfigured,

    /// The underlying API client failed.
    #[error(transparent)]
    Api(#[from] gitlab_api::ApiError),
}

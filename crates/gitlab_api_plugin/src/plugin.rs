//! The configuration holder and its cached shared client.

use std::sync::{Arc, OnceLock};

use gitlab_api::{ApiError, GitLabApiClient};
use tokio::sync::Mutex;

use crate::settings::{ProxySettings, Settings};
use crate::PluginError;

/// User-facing message for a rejected token.
const TOKEN_INCORRECT: &str = "The private token is not valid";

/// User-facing message for every other failure.
const CONNECTION_FAILED: &str = "Could not connect to the GitLab server";

/// Holds the connection settings and a lazily built client.
///
/// Mirrors the host platform's global configuration page: changing the
/// server URL, token or proxy settings invalidates the cached client, and
/// the next [`client`](Self::client) call validates the settings against
/// the server before rebuilding it.
pub struct GitLabConfiguration {
    settings: Settings,
    client: Option<Arc<GitLabApiClient>>,
}

impl GitLabConfiguration {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            client: None,
        }
    }

    /// Loads the stored settings from disk and environment.
    pub fn load() -> Result<Self, PluginError> {
        Ok(Self::new(Settings::load()?))
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True when a server URL and token are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    pub fn set_server_url(&mut self, server_url: impl Into<String>) {
        self.invalidate();
        self.settings.server_url = Some(server_url.into());
    }

    pub fn set_private_token(&mut self, private_token: impl Into<String>) {
        self.invalidate();
        self.settings.private_token = Some(private_token.into());
    }

    pub fn set_proxy(&mut self, proxy: ProxySettings) {
        self.invalidate();
        self.settings.proxy = proxy;
    }

    fn invalidate(&mut self) {
        self.client = None;
    }

    /// Returns the shared client, building and validating it on first use.
    ///
    /// The settings are checked against the live server with a connection
    /// test before the client is cached; a failed test leaves the cache
    /// empty so the next call retries.
    pub async fn client(&mut self) -> Result<Arc<GitLabApiClient>, PluginError> {
        if let Some(client) = &self.client {
            return Ok(Arc::clone(client));
        }

        let config = self.settings.to_client_config()?;
        GitLabApiClient::test_connection(config.clone()).await?;

        let client = Arc::new(GitLabApiClient::new(config)?);
        self.client = Some(Arc::clone(&client));
        tracing::debug!(host = %client.host(), "built shared API client");
        Ok(client)
    }

    /// The process-wide configuration instance.
    ///
    /// Loaded from the stored settings on first access; a load failure
    /// starts unconfigured rather than failing the process.
    pub fn shared() -> &'static Mutex<GitLabConfiguration> {
        static SHARED: OnceLock<Mutex<GitLabConfiguration>> = OnceLock::new();
        SHARED.get_or_init(|| {
            Mutex::new(Self::load().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "could not load settings, starting unconfigured");
                Self::new(Settings::default())
            }))
        })
    }
}

/// Result of validating settings entered on the configuration page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ok,
    Error(String),
}

/// Checks connection settings entered on the configuration page.
///
/// Reporting is two-tier: an authentication failure gets the specific
/// token message, every other error collapses into the generic connection
/// message.
pub async fn check_connection(settings: &Settings) -> Validation {
    let config = match settings.to_client_config() {
        Ok(config) => config,
        Err(_) => return Validation::Error(CONNECTION_FAILED.to_string()),
    };
    collapse(GitLabApiClient::test_connection(config).await)
}

fn collapse(result: Result<(), ApiError>) -> Validation {
    match result {
        Ok(()) => Validation::Ok,
        Err(ApiError::Authentication(_)) => Validation::Error(TOKEN_INCORRECT.to_string()),
        Err(_) => Validation::Error(CONNECTION_FAILED.to_string()),
    }
}

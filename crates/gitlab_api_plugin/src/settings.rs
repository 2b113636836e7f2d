//! Connection settings for the shared GitLab API client.
//!
//! Settings are loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `GITLAB_API_`, e.g.
//!    `GITLAB_API_SERVER_URL`; nested keys use `__`, e.g.
//!    `GITLAB_API_PROXY__HOST`)
//! 2. Config file (`gitlab-api.toml` in the platform config directory, or
//!    `./gitlab-api.toml`)
//! 3. Built-in defaults
//!
//! Example config file:
//! ```toml
//! server_url = "https://gitlab.example.com"
//! private_token = "glpat-..."  # or use GITLAB_API_PRIVATE_TOKEN
//!
//! [proxy]
//! host = "proxy.example.com"   # empty or absent disables the proxy
//! port = 8080
//! username = "squid"
//! password = "..."
//! no_proxy_hosts = ['.*\.internal\.example\.com']
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use gitlab_api::{ClientConfig, ProxyConfig};
use serde::{Deserialize, Serialize};

use crate::PluginError;

/// Persisted connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// GitLab server URL (e.g. "https://gitlab.example.com").
    pub server_url: Option<String>,
    /// Private API token.
    pub private_token: Option<String>,
    /// Request timeout in seconds; the client default applies when unset.
    pub timeout_secs: Option<u64>,
    /// Forward proxy settings.
    pub proxy: ProxySettings,
}

/// Proxy section of the settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Proxy host; empty or absent disables the proxy entirely,
    /// regardless of the other proxy fields.
    pub host: Option<String>,
    /// Proxy port.
    pub port: u16,
    /// Proxy user, when the proxy requires authentication.
    pub username: Option<String>,
    /// Password for `username`.
    pub password: Option<String>,
    /// Hostname patterns excluded from the proxy (full-hostname regular
    /// expressions).
    pub no_proxy_hosts: Vec<String>,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            host: None,
            port: 80,
            username: None,
            password: None,
            no_proxy_hosts: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings from the config file and environment.
    pub fn load() -> Result<Self, PluginError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::config_file() {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        builder =
            builder.add_source(File::new("gitlab-api.toml", FileFormat::Toml).required(false));

        builder
            .add_source(Environment::with_prefix("GITLAB_API").separator("__"))
            .build()
            .and_then(|loaded| loaded.try_deserialize())
            .map_err(|err| PluginError::Settings(err.to_string()))
    }

    /// Platform config file location, e.g.
    /// `~/.config/gitlab-api/gitlab-api.toml` on Linux.
    fn config_file() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gitlab-api")
            .map(|dirs| dirs.config_dir().join("gitlab-api.toml"))
    }

    /// True when both the server URL and the private token are present and
    /// non-empty.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let filled = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty())
        };
        filled(&self.server_url) && filled(&self.private_token)
    }

    /// Converts the settings into a client configuration.
    pub fn to_client_config(&self) -> Result<ClientConfig, PluginError> {
        if !self.is_configured() {
            return Err(PluginError::NotConfigured);
        }
        // is_configured() checked both fields above.
        let server_url = self.server_url.as_deref().unwrap_or_default().trim();
        let private_token = self.private_token.as_deref().unwrap_or_default().trim();

        let mut config = ClientConfig::new(server_url, private_token);

        let proxy_host = self
            .proxy
            .host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty());
        if let Some(proxy_host) = proxy_host {
            let mut proxy = ProxyConfig::new(proxy_host, self.proxy.port)
                .with_excluded_hosts(self.proxy.no_proxy_hosts.clone());
            if let Some(username) = &self.proxy.username {
                proxy = proxy.with_credentials(
                    username,
                    self.proxy.password.clone().unwrap_or_default(),
                );
            }
            config = config.with_proxy(proxy);
        }

        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Settings {
        Settings {
            server_url: Some("https://gitlab.example.com".to_string()),
            private_token: Some("token".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn default_settings_are_not_configured() {
        let settings = Settings::default();
        assert!(!settings.is_configured());
        assert!(matches!(
            settings.to_client_config(),
            Err(PluginError::NotConfigured)
        ));
    }

    #[test]
    fn blank_values_do_not_count_as_configured() {
        let settings = Settings {
            server_url: Some("  ".to_string()),
            private_token: Some("token".to_string()),
            ..Settings::default()
        };
        assert!(!settings.is_configured());
    }

    #[test]
    fn configured_settings_build_a_client_config() {
        let config = configured().to_client_config().expect("client config");
        assert_eq!(config.host, "https://gitlab.example.com");
        assert_eq!(config.private_token.as_deref(), Some("token"));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn empty_proxy_host_disables_the_proxy_entirely() {
        let mut settings = configured();
        settings.proxy = ProxySettings {
            host: Some("".to_string()),
            port: 8080,
            username: Some("squid".to_string()),
            password: Some("secret".to_string()),
            no_proxy_hosts: vec!["localhost".to_string()],
        };

        let config = settings.to_client_config().expect("client config");
        assert!(config.proxy.is_none());
    }

    #[test]
    fn proxy_settings_carry_over() {
        let mut settings = configured();
        settings.proxy = ProxySettings {
            host: Some("proxy.example.com".to_string()),
            port: 8080,
            username: Some("squid".to_string()),
            password: Some("secret".to_string()),
            no_proxy_hosts: vec![r".*\.internal".to_string()],
        };
        settings.timeout_secs = Some(5);

        let config = settings.to_client_config().expect("client config");
        let proxy = config.proxy.expect("proxy configured");
        assert_eq!(proxy.host, "proxy.example.com");
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.user.as_deref(), Some("squid"));
        assert_eq!(proxy.password.as_deref(), Some("secret"));
        assert_eq!(proxy.excluded_hosts, vec![r".*\.internal".to_string()]);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn settings_deserialize_from_toml() {
        let toml = r#"
            server_url = "https://gitlab.example.com"
            private_token = "token"

            [proxy]
            host = "proxy.example.com"
            port = 3128
        "#;
        let settings: Settings = toml_from_str(toml);
        assert!(settings.is_configured());
        assert_eq!(settings.proxy.host.as_deref(), Some("proxy.example.com"));
        assert_eq!(settings.proxy.port, 3128);
    }

    #[test]
    fn proxy_section_defaults_when_absent() {
        let settings: Settings = toml_from_str(r#"server_url = "https://gitlab.example.com""#);
        assert_eq!(settings.proxy, ProxySettings::default());
        assert_eq!(settings.proxy.port, 80);
    }

    fn toml_from_str(toml: &str) -> Settings {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(|loaded| loaded.try_deserialize())
            .expect("settings parse")
    }
}

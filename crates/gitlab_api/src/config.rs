//! Client configuration.

use std::time::Duration;

/// Default per-request timeout.
///
/// The upstream API has no configured timeout; without one a hung
/// connection would block the caller indefinitely.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection parameters for a [`GitLabApiClient`](crate::GitLabApiClient).
///
/// One value type with optional fields, immutable once a client is built
/// from it. Each client owns the configuration it was constructed with.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server, without the API path
    /// (e.g. `https://gitlab.example.com`).
    pub host: String,
    /// Long-lived token authenticating requests. Absent for clients that
    /// only open sessions.
    pub private_token: Option<String>,
    /// Forward proxy, if any.
    pub proxy: Option<ProxyConfig>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `host` authenticated with `private_token`.
    pub fn new(host: impl Into<String>, private_token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            private_token: Some(private_token.into()),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Configuration without credentials, for bootstrapping a session from
    /// a login and password.
    pub fn unauthenticated(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            private_token: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Route requests through a forward proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Override the default request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Forward proxy settings.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Proxy host name.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Proxy user, when the proxy requires authentication.
    pub user: Option<String>,
    /// Password for `user`.
    pub password: Option<String>,
    /// Regular expressions matched against the full target hostname;
    /// matching hosts bypass the proxy. Evaluated in order.
    pub excluded_hosts: Vec<String>,
}

impl ProxyConfig {
    /// Proxy at `host:port` without credentials or exclusions.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            user: None,
            password: None,
            excluded_hosts: Vec::new(),
        }
    }

    /// Authenticate against the proxy with a user and password.
    #[must_use]
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Hostname patterns to exclude from the proxy.
    ///
    /// Each pattern must match the entire hostname; wildcards within a
    /// pattern (e.g. `.*\.example\.com`) are the caller's responsibility.
    #[must_use]
    pub fn with_excluded_hosts(mut self, patterns: Vec<String>) -> Self {
        self.excluded_hosts = patterns;
        self
    }
}

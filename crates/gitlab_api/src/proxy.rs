//! Proxy routing with pattern-based host exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use regex::Regex;

use crate::config::ProxyConfig;
use crate::error::ApiError;

/// Where a request to a given host is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Connect directly, bypassing the proxy.
    Direct,
    /// Connect through the configured proxy.
    Proxy { host: String, port: u16 },
}

/// Decides, per target hostname, whether to bypass the configured proxy.
///
/// Verdicts are memoized: a hostname is matched against the exclusion
/// patterns exactly once for the lifetime of the planner, then answered
/// from the cache. The cache only grows and is never invalidated; changing
/// the pattern list means building a new client. Concurrent in-flight
/// requests may consult the planner simultaneously.
#[derive(Debug)]
pub struct RoutePlanner {
    proxy_host: String,
    proxy_port: u16,
    excluded_hosts: Vec<Regex>,
    decisions: Mutex<HashMap<String, bool>>,
}

impl RoutePlanner {
    /// Compiles the exclusion patterns of `proxy`.
    ///
    /// Patterns are anchored at both ends: a pattern must match the entire
    /// hostname, not a substring of it. An invalid pattern rejects the
    /// whole configuration.
    pub fn new(proxy: &ProxyConfig) -> Result<Self, ApiError> {
        let excluded_hosts = proxy
            .excluded_hosts
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
                    ApiError::configuration(format!(
                        "invalid excluded host pattern {pattern:?}: {err}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            proxy_host: proxy.host.clone(),
            proxy_port: proxy.port,
            excluded_hosts,
            decisions: Mutex::new(HashMap::new()),
        })
    }

    /// Chooses the route for a request to `hostname`.
    pub fn route(&self, hostname: &str) -> Route {
        let mut decisions = self.decisions.lock().expect("route cache lock poisoned");

        let bypass = match decisions.get(hostname) {
            Some(&bypass) => bypass,
            None => {
                let bypass = self
                    .excluded_hosts
                    .iter()
                    .any(|pattern| pattern.is_match(hostname));
                decisions.insert(hostname.to_string(), bypass);
                bypass
            }
        };

        if bypass {
            Route::Direct
        } else {
            Route::Proxy {
                host: self.proxy_host.clone(),
                port: self.proxy_port,
            }
        }
    }

    /// Whether a verdict for `hostname` is already cached.
    #[cfg(test)]
    fn has_decision(&self, hostname: &str) -> bool {
        self.decisions
            .lock()
            .expect("route cache lock poisoned")
            .contains_key(hostname)
    }
}

/// Builds the `reqwest` proxy for a client with exclusion patterns.
///
/// `reqwest` consults the closure once per request URL; excluded hostnames
/// get no proxy, everything else goes through the configured one. The
/// planner lives inside the closure, so the decision cache shares the
/// lifetime of the client's own transport.
pub(crate) fn reqwest_proxy(proxy: &ProxyConfig) -> Result<reqwest::Proxy, ApiError> {
    let planner = Arc::new(RoutePlanner::new(proxy)?);
    let proxy_url = reqwest::Url::parse(&format!("http://{}:{}", proxy.host, proxy.port))
        .map_err(|err| ApiError::configuration(format!("invalid proxy address: {err}")))?;

    let mut built = reqwest::Proxy::custom(move |url| {
        let hostname = url.host_str()?;
        match planner.route(hostname) {
            Route::Direct => None,
            Route::Proxy { .. } => Some(proxy_url.clone()),
        }
    });

    if let Some(user) = &proxy.user {
        built = built.basic_auth(user, proxy.password.as_deref().unwrap_or_default());
    }

    Ok(built)
}

//! Transport boundary for all HTTP I/O.
//!
//! The client talks to the network exclusively through [`HttpTransport`],
//! so the request pipeline can be exercised in tests without sockets. Each
//! client owns its transport instance; transports are never shared between
//! clients with different configurations.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// The two HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A fully encoded outgoing request.
///
/// Field serialization (query string for GET, form body for POST) has
/// already happened by the time a request reaches the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A response reduced to what the pipeline inspects: status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[cfg(test)]
    #[error("no mock response registered for {method} {url}")]
    NoMockResponse { method: String, url: String },
}

/// Transport boundary for all HTTP I/O.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// A real transport backed by reqwest.
///
/// Built once per client from that client's own configuration: timeout and
/// proxy routing are baked into the underlying `reqwest::Client` and never
/// touched again.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport for `config`.
    ///
    /// When a proxy is configured, the client's route planner is installed
    /// so excluded hostnames connect directly.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(crate::proxy::reqwest_proxy(proxy)?);
        }

        let client = builder
            .build()
            .map_err(|err| ApiError::configuration(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| HttpError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| HttpError::Transport(err.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// In-memory transport for unit tests: no sockets, no loopback servers.
///
/// Responses are registered per method + URL and replayed in FIFO order;
/// every request that passes through is recorded for assertions.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<(HttpMethod, String), VecDeque<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: impl Into<Vec<u8>>,
    ) {
        let mut inner = self.inner.lock().expect("mock transport lock poisoned");
        inner
            .routes
            .entry((method, url.into()))
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.into(),
            });
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        let inner = self.inner.lock().expect("mock transport lock poisoned");
        inner.requests.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock().expect("mock transport lock poisoned");

        let key = (request.method, request.url.clone());
        inner.requests.push(request);

        match inner.routes.get_mut(&key).and_then(|queue| queue.pop_front()) {
            Some(response) => Ok(response),
            None => Err(HttpError::NoMockResponse {
                method: key.0.as_str().to_string(),
                url: key.1,
            }),
        }
    }
}

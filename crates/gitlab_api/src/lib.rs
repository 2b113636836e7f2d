//! Typed client for the GitLab REST API (v3).
//!
//! The client authenticates with a long-lived private token, or obtains one
//! through a username/password session exchange, and exposes the user,
//! group and group-membership resources. Outbound requests can be routed
//! through a forward proxy with per-host exclusion patterns, and a
//! privileged client can impersonate another user.
//!
//! # Module structure
//!
//! - [`client`] - Request construction, dispatch and the API operations
//! - [`config`] - Connection and proxy configuration
//! - [`error`] - The [`ApiError`] taxonomy
//! - [`http`] - The transport boundary
//! - [`models`] - Typed entities for the exposed resources
//! - [`proxy`] - Proxy routing with pattern-based host exclusion
//!
//! # Example
//!
//! ```ignore
//! use gitlab_api::{ClientConfig, GitLabApi, GitLabApiClient};
//!
//! let client = GitLabApiClient::new(ClientConfig::new(
//!     "https://gitlab.example.com",
//!     "private-token",
//! ))?;
//! let me = client.get_current_user().await?;
//!
//! // Perform requests as user 42 (requires an administrator token).
//! let theirs = client.as_user(42).get_groups().await?;
//! ```

mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod impersonate;
pub mod models;
pub mod proxy;

pub use client::{ApiRequest, Fields, GitLabApi, GitLabApiClient};
pub use config::{ClientConfig, ProxyConfig, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use impersonate::ImpersonatingClient;
pub use models::{AccessLevel, Group, GroupMember, Session, User};
pub use proxy::{Route, RoutePlanner};

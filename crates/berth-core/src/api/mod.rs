//! Platform API surface.
//!
//! `DeploymentsApi` is the seam between the listing pipeline and the hosting
//! platform: the resolver and aggregator only ever talk to this trait.
//! `HttpClient` implements it over the platform REST API; tests substitute
//! a scripted mock.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpClient;

use async_trait::async_trait;

use crate::types::{Alias, Deployment, Instance};

/// Errors from the platform API collaborators.
///
/// All variants are fatal to the current invocation; the pipeline never
/// retries and never falls back on an error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// The platform rejected the access token.
    #[error("authentication failed (HTTP {status}); check your access token")]
    Unauthorized { status: u16 },

    /// Any other non-success status.
    #[error("unexpected HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body did not match the expected payload shape.
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },
}

/// Read access to the deployment inventory.
#[async_trait]
pub trait DeploymentsApi: Send + Sync {
    /// List deployments, optionally filtered server-side by application name.
    async fn list_deployments(&self, app: Option<&str>) -> Result<Vec<Deployment>, ApiError>;

    /// Look up a single deployment by identifier or URL.
    ///
    /// An unknown identifier resolves to `None`, not an error.
    async fn find_deployment(&self, id_or_url: &str) -> Result<Option<Deployment>, ApiError>;

    /// List the running instances of one deployment.
    async fn list_instances(&self, uid: &str) -> Result<Vec<Instance>, ApiError>;

    /// Fetch the full alias table.
    async fn list_aliases(&self) -> Result<Vec<Alias>, ApiError>;
}

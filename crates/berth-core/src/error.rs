//! Error taxonomy for the listing pipeline.

use crate::api::ApiError;

/// Errors surfaced by the listing pipeline.
///
/// An empty resolution result is not an error; it flows through aggregation
/// and rendering as a zero-deployment report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid flag or argument combination, caught before any network access.
    #[error("{0}")]
    Usage(String),

    /// Unusable credentials or configuration, caught before any network access.
    #[error("{0}")]
    Config(String),

    /// A platform API call failed; the pipeline aborts immediately.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Berth Core Library
//!
//! Provides the domain logic for deployment inventory reporting:
//! resolving user-supplied targets into deployments, grouping them by
//! owning application, and rendering column-aligned terminal reports.

pub mod aggregate;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod resolve;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{ListCommand, ListOptions, ListReport};

    // Pipeline
    pub use crate::aggregate::{Aggregator, GroupComparator, compare_groups_by_recency};
    pub use crate::render::{RenderOptions, render};
    pub use crate::resolve::{ListQuery, Resolver};

    // Platform API
    pub use crate::api::{ApiError, DeploymentsApi, HttpClient};

    // Configuration
    pub use crate::config::Credentials;

    // Domain types
    pub use crate::types::{Alias, Deployment, DeploymentGroup, Instance, Scale};

    // Errors
    pub use crate::error::{Error, Result};
}

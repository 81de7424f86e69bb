//! Shared domain types for the deployment inventory.
//!
//! Wire types mirror the platform API payloads; timestamps arrive as epoch
//! milliseconds and are decoded into `chrono` values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One shipped version of an application on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    /// Unique deployment identifier.
    pub uid: String,
    /// Owning application name; groups deployments into applications.
    /// Deployments without a name arrive as an empty string.
    #[serde(default)]
    pub name: String,
    /// Deployment host, without a URL scheme.
    pub url: String,
    /// Platform state (`READY`, `FROZEN`, ...); may be absent.
    pub state: Option<String>,
    /// Creation time, epoch milliseconds on the wire.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Live scaling information, when the platform reports it.
    pub scale: Option<Scale>,
    /// Instance list, populated once during aggregation when expansion
    /// was requested. Never part of the wire payload.
    #[serde(skip)]
    pub instances: Option<Vec<Instance>>,
}

/// Live scaling snapshot of one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Number of running instances.
    pub current: u32,
}

/// A running replica backing one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance host, without a URL scheme.
    pub url: String,
}

/// A human-friendly name mapped to a specific deployment.
///
/// Only consulted during resolution fallback, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub uid: String,
    pub alias: String,
    #[serde(rename = "deploymentId")]
    pub deployment_id: String,
}

/// Deployments of one application, in resolver order.
///
/// Built fresh per invocation, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentGroup {
    /// Application name; empty for unnamed deployments.
    pub app: String,
    pub deployments: Vec<Deployment>,
}

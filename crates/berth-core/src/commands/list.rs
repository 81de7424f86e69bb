//! List command implementation.
//!
//! Ties the pipeline together: resolve the target into deployments,
//! aggregate them into application groups, and render the report.
//! Frontends decide how the report text reaches the user.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::aggregate::Aggregator;
use crate::api::DeploymentsApi;
use crate::error::Result;
use crate::render::{self, DEFAULT_URL_PREFIX, RenderOptions};
use crate::resolve::{ListQuery, Resolver};

/// Options for the list command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Application name, deployment id, URL, or alias to list
    pub app: Option<String>,
    /// List every deployment per application and expand instances
    pub all: bool,
    /// Whether the output stream supports styling
    pub styled: bool,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target to resolve
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Enable full listing with instance expansion
    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Mark the output stream as styling-capable
    pub fn with_styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }
}

/// Outcome of one list invocation
#[derive(Debug, Clone)]
pub struct ListReport {
    /// Rendered report, ready to print
    pub output: String,
    /// Number of deployments resolved
    pub deployments: usize,
    /// Number of application groups in the report
    pub applications: usize,
    /// Time spent resolving and aggregating
    pub elapsed: Duration,
}

/// Lists deployments grouped by owning application.
pub struct ListCommand {
    api: Arc<dyn DeploymentsApi>,
    scope: String,
}

impl ListCommand {
    /// Create a list command talking to the given API under one account
    /// scope (team slug, username, or email).
    pub fn new(api: Arc<dyn DeploymentsApi>, scope: impl Into<String>) -> Self {
        Self {
            api,
            scope: scope.into(),
        }
    }

    /// Run the resolve, aggregate, render pipeline.
    ///
    /// The reported elapsed time covers resolution and aggregation, the
    /// part that talks to the network; rendering is local and excluded.
    pub async fn execute(&self, options: &ListOptions) -> Result<ListReport> {
        let started = Instant::now();

        let query = ListQuery {
            app: options.app.clone(),
            expand_instances: options.all,
        };
        let deployments = Resolver::new(self.api.as_ref()).resolve(&query).await?;
        tracing::debug!(count = deployments.len(), "deployments resolved");

        let total = deployments.len();
        let groups = Aggregator::new(Arc::clone(&self.api))
            .aggregate(deployments, options.all)
            .await;
        let elapsed = started.elapsed();

        let output = render::render(
            &groups,
            &RenderOptions {
                show_all: options.all,
                styled: options.styled,
                url_prefix: DEFAULT_URL_PREFIX,
                scope: &self.scope,
                elapsed,
                now: Utc::now(),
            },
        );

        Ok(ListReport {
            output,
            deployments: total,
            applications: groups.len(),
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::error::Error;
    use crate::types::{Deployment, Instance};
    use chrono::TimeZone;

    fn deployment(uid: &str, name: &str, created_ms: i64) -> Deployment {
        Deployment {
            uid: uid.to_string(),
            name: name.to_string(),
            url: format!("{uid}.example.dev"),
            state: Some("READY".to_string()),
            created: Some(Utc.timestamp_millis_opt(created_ms).unwrap()),
            scale: None,
            instances: None,
        }
    }

    #[test]
    fn test_options_compose_with_builders() {
        let options = ListOptions::new()
            .with_app("api")
            .with_all(true)
            .with_styled(true);

        assert_eq!(options.app.as_deref(), Some("api"));
        assert!(options.all);
        assert!(options.styled);
    }

    #[tokio::test]
    async fn test_execute_renders_grouped_report() {
        let api = Arc::new(MockApi::new().with_deployments(vec![
            deployment("dep_1", "api", 2_000),
            deployment("dep_2", "web", 8_000),
        ]));
        let command = ListCommand::new(api, "acme");

        let report = command.execute(&ListOptions::new()).await.unwrap();

        assert_eq!(report.deployments, 2);
        assert_eq!(report.applications, 2);
        assert!(report.output.starts_with("2 deployments found under acme"));
        // web deployed later, so its section comes first.
        let web_at = report.output.find("web (").unwrap();
        let api_at = report.output.find("api (").unwrap();
        assert!(web_at < api_at);
    }

    #[tokio::test]
    async fn test_expansion_requires_target() {
        let api = Arc::new(MockApi::new());
        let command = ListCommand::new(api.clone(), "acme");

        let err = command
            .execute(&ListOptions::new().with_all(true))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Usage(_)));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_expansion_renders_instance_rows() {
        let api = Arc::new(
            MockApi::new()
                .with_deployments(vec![
                    deployment("dep_1", "api", 2_000),
                    deployment("dep_2", "api", 4_000),
                ])
                .with_instances(
                    "dep_1",
                    vec![Instance {
                        url: "dep_1-a.example.dev".to_string(),
                    }],
                )
                .with_instances(
                    "dep_2",
                    vec![Instance {
                        url: "dep_2-a.example.dev".to_string(),
                    }],
                ),
        );
        let command = ListCommand::new(api.clone(), "acme");

        let report = command
            .execute(&ListOptions::new().with_app("api").with_all(true))
            .await
            .unwrap();

        assert!(report.output.contains("   - https://dep_1-a.example.dev"));
        assert!(report.output.contains("   - https://dep_2-a.example.dev"));
        assert_eq!(
            api.instance_calls.load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }
}

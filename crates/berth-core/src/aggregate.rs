//! Grouping and enrichment of resolved deployments.
//!
//! Partitions deployments into per-application groups, optionally fans out
//! one concurrent instance fetch per deployment, and orders the groups.
//! Instance-fetch failures degrade that one deployment to an empty
//! instance list; aggregation itself never fails.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::DeploymentsApi;
use crate::types::{Deployment, DeploymentGroup};

/// Total order over groups, injected so callers can re-sort reports.
pub type GroupComparator = Box<dyn Fn(&DeploymentGroup, &DeploymentGroup) -> Ordering + Send + Sync>;

/// Builds ordered per-application groups from resolved deployments.
pub struct Aggregator {
    api: Arc<dyn DeploymentsApi>,
    compare: GroupComparator,
}

impl Aggregator {
    /// Aggregator with the default most-recent-first group order.
    pub fn new(api: Arc<dyn DeploymentsApi>) -> Self {
        Self {
            api,
            compare: Box::new(compare_groups_by_recency),
        }
    }

    /// Replace the group order.
    pub fn with_comparator(mut self, compare: GroupComparator) -> Self {
        self.compare = compare;
        self
    }

    /// Group the deployments by application and sort the groups.
    ///
    /// With `expand` set, every deployment gets its instance list fetched
    /// concurrently and attached before grouping.
    pub async fn aggregate(
        &self,
        mut deployments: Vec<Deployment>,
        expand: bool,
    ) -> Vec<DeploymentGroup> {
        if expand {
            self.attach_instances(&mut deployments).await;
        }

        let mut groups = partition_by_app(deployments);
        groups.sort_by(|a, b| (self.compare)(a, b));
        groups
    }

    /// Fetch instance lists for all deployments at once and attach them.
    ///
    /// Each fetch runs in its own task; a failed or panicked fetch leaves
    /// that deployment with an empty instance list instead of poisoning
    /// the whole report.
    async fn attach_instances(&self, deployments: &mut [Deployment]) {
        let handles: Vec<_> = deployments
            .iter()
            .map(|deployment| {
                let api = Arc::clone(&self.api);
                let uid = deployment.uid.clone();
                tokio::spawn(async move { api.list_instances(&uid).await })
            })
            .collect();

        for (deployment, handle) in deployments.iter_mut().zip(handles) {
            let instances = match handle.await {
                Ok(Ok(instances)) => instances,
                Ok(Err(error)) => {
                    tracing::debug!(
                        uid = %deployment.uid,
                        %error,
                        "instance fetch failed; rendering without instances"
                    );
                    Vec::new()
                }
                Err(error) => {
                    tracing::debug!(
                        uid = %deployment.uid,
                        %error,
                        "instance task failed; rendering without instances"
                    );
                    Vec::new()
                }
            };
            deployment.instances = Some(instances);
        }
    }
}

/// Most recently deployed application first; groups with no timestamps
/// sort last and ties break on the application name.
pub fn compare_groups_by_recency(a: &DeploymentGroup, b: &DeploymentGroup) -> Ordering {
    newest_created(b)
        .cmp(&newest_created(a))
        .then_with(|| a.app.cmp(&b.app))
}

fn newest_created(group: &DeploymentGroup) -> Option<DateTime<Utc>> {
    group
        .deployments
        .iter()
        .filter_map(|deployment| deployment.created)
        .max()
}

/// Split deployments into one group per application name, keeping the
/// resolver's order both across groups and inside each group.
fn partition_by_app(deployments: Vec<Deployment>) -> Vec<DeploymentGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DeploymentGroup> = Vec::new();

    for deployment in deployments {
        match index.get(&deployment.name) {
            Some(&at) => groups[at].deployments.push(deployment),
            None => {
                index.insert(deployment.name.clone(), groups.len());
                groups.push(DeploymentGroup {
                    app: deployment.name.clone(),
                    deployments: vec![deployment],
                });
            }
        }
    }

    groups
}

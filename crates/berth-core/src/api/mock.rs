//! Scripted platform API for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::types::{Alias, Deployment, Instance};

use super::{ApiError, DeploymentsApi};

/// Canned stand-in for the platform API.
///
/// Every call is counted so tests can assert which collaborators ran and,
/// in particular, that nothing ran at all.
#[derive(Default)]
pub(crate) struct MockApi {
    deployments: Vec<Deployment>,
    lookups: HashMap<String, Deployment>,
    aliases: Vec<Alias>,
    instances: HashMap<String, Vec<Instance>>,
    fail_list: bool,
    fail_find: bool,
    failing_instances: HashSet<String>,

    pub list_calls: AtomicUsize,
    pub find_calls: AtomicUsize,
    pub instance_calls: AtomicUsize,
    pub alias_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result for any `list_deployments` call.
    pub fn with_deployments(mut self, deployments: Vec<Deployment>) -> Self {
        self.deployments = deployments;
        self
    }

    /// Register a `find_deployment` hit for one identifier.
    pub fn with_lookup(mut self, id: impl Into<String>, deployment: Deployment) -> Self {
        self.lookups.insert(id.into(), deployment);
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<Alias>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Instance list returned for one deployment uid.
    pub fn with_instances(mut self, uid: impl Into<String>, instances: Vec<Instance>) -> Self {
        self.instances.insert(uid.into(), instances);
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_find(mut self) -> Self {
        self.fail_find = true;
        self
    }

    /// Make the instance fetch for one uid fail.
    pub fn failing_instances(mut self, uid: impl Into<String>) -> Self {
        self.failing_instances.insert(uid.into());
        self
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.find_calls.load(Ordering::SeqCst)
            + self.instance_calls.load(Ordering::SeqCst)
            + self.alias_calls.load(Ordering::SeqCst)
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            url: "mock://berth".to_string(),
        }
    }
}

#[async_trait]
impl DeploymentsApi for MockApi {
    async fn list_deployments(&self, _app: Option<&str>) -> Result<Vec<Deployment>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(Self::server_error());
        }
        Ok(self.deployments.clone())
    }

    async fn find_deployment(&self, id_or_url: &str) -> Result<Option<Deployment>, ApiError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find {
            return Err(Self::server_error());
        }
        Ok(self.lookups.get(id_or_url).cloned())
    }

    async fn list_instances(&self, uid: &str) -> Result<Vec<Instance>, ApiError> {
        self.instance_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_instances.contains(uid) {
            return Err(Self::server_error());
        }
        Ok(self.instances.get(uid).cloned().unwrap_or_default())
    }

    async fn list_aliases(&self) -> Result<Vec<Alias>, ApiError> {
        self.alias_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.aliases.clone())
    }
}

//! Target resolution.
//!
//! Turns a user-supplied target (an application name, deployment id, URL,
//! or alias) into concrete deployment records via a three-tier fallback
//! search. Tiers run in order and only an exactly-empty result falls
//! through to the next tier; any API error aborts resolution immediately.

use crate::api::DeploymentsApi;
use crate::error::{Error, Result};
use crate::types::Deployment;

/// Immutable description of one listing request, passed through the
/// pipeline instead of ambient state.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Application name, deployment id, URL, or alias to resolve.
    /// `None` lists every deployment in scope.
    pub app: Option<String>,
    /// Whether per-deployment instance lists will be fetched later.
    pub expand_instances: bool,
}

/// Resolution strategies, attempted in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    /// Server-side listing filtered by application name.
    Listing,
    /// Direct lookup by deployment id or URL.
    Lookup,
    /// Alias-table indirection to a deployment id.
    Alias,
}

const TIERS: [Tier; 3] = [Tier::Listing, Tier::Lookup, Tier::Alias];

/// Resolves a target into deployment records over the platform API.
pub struct Resolver<'a> {
    api: &'a dyn DeploymentsApi,
}

impl<'a> Resolver<'a> {
    pub fn new(api: &'a dyn DeploymentsApi) -> Self {
        Self { api }
    }

    /// Resolve the query into an ordered list of deployments.
    ///
    /// An empty result means "nothing found" and is not an error; callers
    /// must treat it as valid data. Instance expansion without a target is
    /// rejected before any network access.
    pub async fn resolve(&self, query: &ListQuery) -> Result<Vec<Deployment>> {
        if query.expand_instances && query.app.is_none() {
            return Err(Error::usage(
                "the --all flag requires an application name",
            ));
        }

        let Some(target) = query.app.as_deref() else {
            return Ok(self.api.list_deployments(None).await?);
        };

        for tier in TIERS {
            match self.attempt(tier, target).await? {
                Some(found) => {
                    tracing::debug!(?tier, count = found.len(), "target resolved");
                    return Ok(found);
                }
                None => tracing::debug!(?tier, "no match, trying next tier"),
            }
        }

        Ok(Vec::new())
    }

    /// Run one tier. `None` means the tier came up empty and the next one
    /// should be tried; errors propagate and never fall through.
    async fn attempt(&self, tier: Tier, target: &str) -> Result<Option<Vec<Deployment>>> {
        match tier {
            Tier::Listing => {
                let listed = self.api.list_deployments(Some(target)).await?;
                Ok((!listed.is_empty()).then_some(listed))
            }
            Tier::Lookup => {
                let found = self.api.find_deployment(target).await?;
                Ok(found.map(|deployment| vec![deployment]))
            }
            Tier::Alias => {
                let aliases = self.api.list_aliases().await?;
                let Some(entry) = aliases
                    .iter()
                    .find(|alias| alias.uid == target || alias.alias == target)
                else {
                    return Ok(None);
                };
                let found = self.api.find_deployment(&entry.deployment_id).await?;
                Ok(found.map(|deployment| vec![deployment]))
            }
        }
    }
}

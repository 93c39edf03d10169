//! Listings fetched once per environment and kind.

use crate::environment::EnvironmentSet;
use crate::error::{Error, Result};
use registry::{Registry, ResourceKind, ResourceRecord};
use std::collections::HashMap;

/// Every record of every kind, per environment.
///
/// Built once at the start of a run. The resolver only ever reads it, so
/// a run makes one workspace lookup and one listing per kind for each
/// environment, however many resources the checkout declares.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    listings: HashMap<(String, ResourceKind), Vec<ResourceRecord>>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch listings from each environment's registry.
    ///
    /// Listings are scoped to the first workspace each registry exposes.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEnvironment` when a tracked environment has no
    /// registry, and `Error::Registry` when any remote call fails.
    pub fn fetch(envs: &EnvironmentSet, registries: &HashMap<String, Box<dyn Registry>>) -> Result<Self> {
        let mut snapshot = Self::new();

        for env in envs.iter() {
            let registry = registries
                .get(env)
                .ok_or_else(|| Error::UnknownEnvironment(env.to_string()))?;

            let workspace_id = registry
                .default_workspace_id()
                .map_err(|e| Error::registry(env, e))?;
            log::debug!("Environment {env}: workspace {workspace_id}");

            for kind in ResourceKind::all() {
                let records = registry
                    .list(*kind, &workspace_id)
                    .map_err(|e| Error::registry(env, e))?;
                log::info!("Environment {env}: {} {}", records.len(), kind.plural());
                snapshot.insert(env, *kind, records);
            }
        }

        Ok(snapshot)
    }

    /// Store a listing, replacing any previous one.
    pub fn insert(&mut self, env: &str, kind: ResourceKind, records: Vec<ResourceRecord>) {
        self.listings.insert((env.to_string(), kind), records);
    }

    /// Listing for an environment and kind. Empty if never fetched.
    #[must_use]
    pub fn listing(&self, env: &str, kind: ResourceKind) -> &[ResourceRecord] {
        self.listings
            .get(&(env.to_string(), kind))
            .map_or(&[], Vec::as_slice)
    }
}

//! Cross-environment matching of resources by name.

use crate::environment::EnvironmentSet;
use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use registry::{ResourceKind, ResourceRecord};
use std::collections::BTreeMap;

/// One logical resource and its record in each environment.
///
/// An environment without a record has no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGroup {
    /// Kind of the resource.
    pub kind: ResourceKind,
    /// Matching key.
    pub name: String,
    records: BTreeMap<String, ResourceRecord>,
}

impl MatchGroup {
    /// Create an empty group.
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            records: BTreeMap::new(),
        }
    }

    /// Record the match for an environment.
    pub fn insert(&mut self, env: impl Into<String>, record: ResourceRecord) {
        self.records.insert(env.into(), record);
    }

    /// The match in an environment, if any.
    #[must_use]
    pub fn get(&self, env: &str) -> Option<&ResourceRecord> {
        self.records.get(env)
    }

    /// The match in an environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingMatch` if the environment has none.
    pub fn require(&self, env: &str) -> Result<&ResourceRecord> {
        self.get(env).ok_or_else(|| Error::MissingMatch {
            kind: self.kind,
            name: self.name.clone(),
            environment: env.to_string(),
        })
    }

    /// Number of environments holding a match.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no environment holds a match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Find the record named `name` in every environment.
///
/// # Errors
///
/// Returns `Error::AmbiguousResource` naming every environment where more
/// than one record carries the name.
pub fn resolve(
    kind: ResourceKind,
    name: &str,
    snapshot: &Snapshot,
    envs: &EnvironmentSet,
) -> Result<MatchGroup> {
    select(kind, name, snapshot, envs, |record| record.name == name)
}

/// Take the only record of `kind` in every environment, whatever its name.
///
/// Used for the destination, of which each environment holds exactly one.
///
/// # Errors
///
/// Returns `Error::AmbiguousResource` when an environment holds several.
pub fn resolve_single(
    kind: ResourceKind,
    label: &str,
    snapshot: &Snapshot,
    envs: &EnvironmentSet,
) -> Result<MatchGroup> {
    select(kind, label, snapshot, envs, |_| true)
}

fn select(
    kind: ResourceKind,
    name: &str,
    snapshot: &Snapshot,
    envs: &EnvironmentSet,
    predicate: impl Fn(&ResourceRecord) -> bool,
) -> Result<MatchGroup> {
    let mut group = MatchGroup::new(kind, name);
    let mut ambiguous = Vec::new();

    for env in envs.iter() {
        let found: Vec<&ResourceRecord> = snapshot
            .listing(env, kind)
            .iter()
            .filter(|record| predicate(record))
            .collect();

        match found.as_slice() {
            [] => log::debug!("{kind} `{name}` absent from {env}"),
            [record] => group.insert(env, (*record).clone()),
            _ => ambiguous.push(env.to_string()),
        }
    }

    if !ambiguous.is_empty() {
        return Err(Error::AmbiguousResource {
            kind,
            name: name.to_string(),
            environments: ambiguous,
        });
    }

    Ok(group)
}

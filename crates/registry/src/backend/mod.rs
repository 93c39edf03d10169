//! Registry traits and implementations.
//!
//! [`Registry`] lists resources of one environment of the orchestration
//! service; [`airbyte::HttpRegistry`] is the HTTP implementation.
//! [`SecretsCatalog`] enumerates the credential names declared for the
//! product; [`github::GitHubSecrets`] reads them from repository action
//! secrets.
//!
//! # Testing
//!
//! Use [`MockRegistry`] and [`MockSecrets`] for testing without network
//! access:
//!
//! ```
//! use registry::backend::{MockRegistry, Registry};
//! use registry::{ResourceKind, ResourceRecord};
//! use serde_json::json;
//!
//! let mock = MockRegistry::new().with_record(ResourceRecord::new(
//!     ResourceKind::Source,
//!     "src-1",
//!     "Orders API",
//!     json!({}),
//! ));
//!
//! let workspace = mock.default_workspace_id().unwrap();
//! let sources = mock.list(ResourceKind::Source, &workspace).unwrap();
//! assert_eq!(sources.len(), 1);
//! ```

pub mod airbyte;
pub mod github;

use crate::error::{Error, Result};
use crate::types::{ResourceKind, ResourceRecord, Workspace};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read access to one environment of the orchestration service.
pub trait Registry: Send + Sync {
    /// List the workspaces visible to the configured credentials.
    fn list_workspaces(&self) -> Result<Vec<Workspace>>;

    /// List every record of `kind` in a workspace.
    fn list(&self, kind: ResourceKind, workspace_id: &str) -> Result<Vec<ResourceRecord>>;

    /// Identifier of the first workspace, the default listing scope.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResponse` if no workspace is visible.
    fn default_workspace_id(&self) -> Result<String> {
        self.list_workspaces()?
            .into_iter()
            .next()
            .map(|w| w.workspace_id)
            .ok_or_else(|| Error::InvalidResponse("no workspace available".to_string()))
    }
}

/// Source of the credential names a product declares.
pub trait SecretsCatalog: Send + Sync {
    /// Names of every declared secret.
    fn secret_names(&self) -> Result<BTreeSet<String>>;
}

/// Mock registry for testing without network access.
///
/// Counts calls so tests can check how many remote round-trips a run makes.
#[derive(Debug, Clone)]
pub struct MockRegistry {
    workspaces: Vec<Workspace>,
    records: HashMap<ResourceKind, Vec<ResourceRecord>>,
    failure: Option<u16>,
    calls: Arc<AtomicUsize>,
}

impl MockRegistry {
    /// Workspace id every new mock exposes.
    pub const WORKSPACE_ID: &'static str = "mock-workspace";

    /// Create a mock with one workspace and no records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workspaces: vec![Workspace {
                workspace_id: Self::WORKSPACE_ID.to_string(),
                name: "Mock".to_string(),
            }],
            records: HashMap::new(),
            failure: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a record.
    pub fn add(&mut self, record: ResourceRecord) {
        self.records.entry(record.kind).or_default().push(record);
    }

    /// Add a record, builder style.
    #[must_use]
    pub fn with_record(mut self, record: ResourceRecord) -> Self {
        self.add(record);
        self
    }

    /// Make every call fail with the given HTTP status.
    #[must_use]
    pub fn failing(mut self, status: u16) -> Self {
        self.failure = Some(status);
        self
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(status) => Err(Error::http(format!("HTTP {status}"), Some(status))),
            None => Ok(()),
        }
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for MockRegistry {
    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        self.record_call()?;
        Ok(self.workspaces.clone())
    }

    fn list(&self, kind: ResourceKind, workspace_id: &str) -> Result<Vec<ResourceRecord>> {
        self.record_call()?;
        if !self.workspaces.iter().any(|w| w.workspace_id == workspace_id) {
            return Err(Error::http(format!("unknown workspace {workspace_id}"), Some(404)));
        }
        Ok(self.records.get(&kind).cloned().unwrap_or_default())
    }
}

/// Mock secrets catalog.
#[derive(Debug, Clone, Default)]
pub struct MockSecrets {
    names: BTreeSet<String>,
}

impl MockSecrets {
    /// Create a catalog holding the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl SecretsCatalog for MockSecrets {
    fn secret_names(&self) -> Result<BTreeSet<String>> {
        Ok(self.names.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(id: &str, name: &str) -> ResourceRecord {
        ResourceRecord::new(ResourceKind::Source, id, name, json!({}))
    }

    #[test]
    fn test_mock_registry_new() {
        let mock = MockRegistry::new();
        let sources = mock
            .list(ResourceKind::Source, MockRegistry::WORKSPACE_ID)
            .unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_mock_registry_lists_by_kind() {
        let mock = MockRegistry::new()
            .with_record(source("src-1", "Orders API"))
            .with_record(ResourceRecord::new(
                ResourceKind::Destination,
                "dst-1",
                "BigQuery",
                json!({}),
            ));

        let sources = mock
            .list(ResourceKind::Source, MockRegistry::WORKSPACE_ID)
            .unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "src-1");

        let connections = mock
            .list(ResourceKind::Connection, MockRegistry::WORKSPACE_ID)
            .unwrap();
        assert!(connections.is_empty());
    }

    #[test]
    fn test_mock_registry_default_workspace() {
        let mock = MockRegistry::new();
        assert_eq!(mock.default_workspace_id().unwrap(), MockRegistry::WORKSPACE_ID);
    }

    #[test]
    fn test_mock_registry_unknown_workspace() {
        let mock = MockRegistry::new();
        let result = mock.list(ResourceKind::Source, "elsewhere");
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[test]
    fn test_mock_registry_failing() {
        let mock = MockRegistry::new().failing(401);
        let err = mock.list_workspaces().unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_mock_registry_counts_calls() {
        let mock = MockRegistry::new();
        let clone = mock.clone();

        mock.list_workspaces().unwrap();
        mock.list(ResourceKind::Source, MockRegistry::WORKSPACE_ID)
            .unwrap();

        assert_eq!(mock.call_count(), 2);
        assert_eq!(clone.call_count(), 2);
    }

    #[test]
    fn test_mock_secrets() {
        let secrets = MockSecrets::new(["DEV_TOKEN", "PROD_TOKEN"]);
        let names = secrets.secret_names().unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("DEV_TOKEN"));
    }
}

//! Core types for registry records.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The kinds of remote objects the orchestration service manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// A connector reading data.
    Source,
    /// A connector writing data.
    Destination,
    /// A sync pairing one source with one destination.
    Connection,
}

impl ResourceKind {
    /// All kinds, in the order listings are fetched.
    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[Self::Source, Self::Destination, Self::Connection]
    }

    /// Singular lowercase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
            Self::Connection => "connection",
        }
    }

    /// Plural name, used both in API paths and as the response collection key.
    #[must_use]
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Source => "sources",
            Self::Destination => "destinations",
            Self::Connection => "connections",
        }
    }

    /// Field carrying the record identifier in API objects.
    #[must_use]
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::Source => "sourceId",
            Self::Destination => "destinationId",
            Self::Connection => "connectionId",
        }
    }

    /// API path listing records of this kind in a workspace.
    #[must_use]
    pub fn list_path(&self) -> String {
        format!("/v1/{}/list", self.plural())
    }

    /// Parse a directory name such as `sources` or `connections`.
    #[must_use]
    pub fn from_plural(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.plural() == s)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A workspace on the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Opaque identifier.
    #[serde(rename = "workspaceId")]
    pub workspace_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// One remote object as returned by the registry.
///
/// `config` is the raw object, field order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    /// Opaque identifier (`sourceId`, `destinationId` or `connectionId`).
    pub id: String,
    /// Display name, the cross-environment matching key.
    pub name: String,
    /// Kind of the record.
    pub kind: ResourceKind,
    /// Raw object.
    pub config: Value,
}

impl ResourceRecord {
    /// Build a record from its parts.
    pub fn new(
        kind: ResourceKind,
        id: impl Into<String>,
        name: impl Into<String>,
        config: Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            config,
        }
    }

    /// Build a record from an API object, extracting its id and name.
    pub fn from_json(kind: ResourceKind, value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidResponse(format!(
                "expected a {kind} object, got {value}"
            )));
        }

        let id = value
            .get(kind.id_field())
            .and_then(Value::as_str)
            .ok_or_else(|| Error::missing_field(kind, kind.id_field()))?
            .to_string();
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::missing_field(kind, "name"))?
            .to_string();

        Ok(Self {
            id,
            name,
            kind,
            config: value,
        })
    }

    /// Raw field lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// String field lookup.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_paths() {
        assert_eq!(ResourceKind::Source.list_path(), "/v1/sources/list");
        assert_eq!(ResourceKind::Destination.list_path(), "/v1/destinations/list");
        assert_eq!(ResourceKind::Connection.list_path(), "/v1/connections/list");
    }

    #[test]
    fn test_kind_id_fields() {
        assert_eq!(ResourceKind::Source.id_field(), "sourceId");
        assert_eq!(ResourceKind::Destination.id_field(), "destinationId");
        assert_eq!(ResourceKind::Connection.id_field(), "connectionId");
    }

    #[test]
    fn test_kind_from_plural() {
        assert_eq!(ResourceKind::from_plural("sources"), Some(ResourceKind::Source));
        assert_eq!(
            ResourceKind::from_plural("connections"),
            Some(ResourceKind::Connection)
        );
        assert_eq!(ResourceKind::from_plural("source"), None);
    }

    #[test]
    fn test_record_from_json() {
        let record = ResourceRecord::from_json(
            ResourceKind::Source,
            json!({"sourceId": "src-1", "name": "Orders API", "workspaceId": "ws"}),
        )
        .unwrap();

        assert_eq!(record.id, "src-1");
        assert_eq!(record.name, "Orders API");
        assert_eq!(record.str_field("workspaceId"), Some("ws"));
    }

    #[test]
    fn test_record_from_json_missing_id() {
        let err = ResourceRecord::from_json(
            ResourceKind::Connection,
            json!({"sourceId": "src-1", "name": "Orders Sync"}),
        )
        .unwrap_err();

        match err {
            Error::MissingField { kind, field } => {
                assert_eq!(kind, ResourceKind::Connection);
                assert_eq!(field, "connectionId");
            }
            _ => panic!("Expected Error::MissingField"),
        }
    }

    #[test]
    fn test_record_from_json_not_object() {
        let err = ResourceRecord::from_json(ResourceKind::Source, json!(["a"])).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_record_preserves_field_order() {
        let raw = r#"{"sourceId": "s", "zeta": 1, "name": "n", "alpha": 2}"#;
        let value: Value = serde_json::from_str(raw).unwrap();
        let record = ResourceRecord::from_json(ResourceKind::Source, value).unwrap();

        let keys: Vec<_> = record.config.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["sourceId", "zeta", "name", "alpha"]);
    }
}

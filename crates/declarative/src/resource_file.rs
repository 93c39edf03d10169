//! Per-resource configuration files from the product checkout.

use crate::error::{Error, Result};
use registry::ResourceKind;
use serde_json::Value;

/// One `configuration.yaml` of the checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFile {
    /// Kind, taken from the folder the file lives under.
    pub kind: ResourceKind,
    /// Name of the resource's folder.
    pub label: String,
    /// Parsed file, field order preserved.
    pub content: Value,
}

impl ResourceFile {
    /// Create a resource file.
    pub fn new(kind: ResourceKind, label: impl Into<String>, content: Value) -> Self {
        Self {
            kind,
            label: label.into(),
            content,
        }
    }

    /// The remote name of the resource, its cross-environment matching key.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `resource_name` is missing.
    pub fn resource_name(&self) -> Result<&str> {
        self.str_field("resource_name")
    }

    /// A required top-level string field.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the field is missing or not a string.
    pub fn str_field(&self, key: &str) -> Result<&str> {
        self.content
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_config(&self.label, format!("missing `{key}`")))
    }

    /// A nested value, following `path` through objects.
    #[must_use]
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.content, |value, key| value.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file() -> ResourceFile {
        ResourceFile::new(
            ResourceKind::Connection,
            "orders sync",
            json!({
                "resource_name": "Orders Sync",
                "configuration": {"sync_catalog": {"streams": []}}
            }),
        )
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(file().resource_name().unwrap(), "Orders Sync");
    }

    #[test]
    fn test_missing_field_names_label() {
        let err = file().str_field("definition_image").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration for `orders sync`: missing `definition_image`"
        );
    }

    #[test]
    fn test_pointer() {
        let file = file();
        assert!(file.pointer(&["configuration", "sync_catalog", "streams"]).unwrap().is_array());
        assert!(file.pointer(&["configuration", "nope"]).is_none());
    }
}

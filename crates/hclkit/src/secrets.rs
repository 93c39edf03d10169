//! Rewriting of `${NAME}` placeholders into variable references.
//!
//! Connector configurations captured from a live deployment carry secrets
//! as `${NAME}` placeholders. In the generated document they must read
//! `${var.NAME}`, while interpolations that already reference something
//! (`${var.X}`, `${local.x}`, `${airbyte_source_x.y.source_id}`) stay as they
//! are. What counts as a reference is an explicit list of prefixes; resource
//! types emitted during a run are added to it as they appear. A dotted
//! reference outside that list is an error.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Placeholder meaning "use the source's own namespace". It is resolved by
/// the connector at sync time, so Terraform must see it escaped.
pub const SOURCE_NAMESPACE: &str = "SOURCE_NAMESPACE";

/// Reference prefixes understood by Terraform itself.
pub const BUILTIN_REFERENCE_PREFIXES: &[&str] = &[
    "var.",
    "local.",
    "data.",
    "each.",
    "count.",
    "module.",
    "path.",
    "self.",
    "terraform.",
];

/// An optional extra `$` marks an already escaped sequence.
static INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\$?)\$\{([^{}]*)\}").expect("valid interpolation regex"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Dotted traversal such as `airbyte_source_x.orders.source_id`.
pub(crate) static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*(?:\.[A-Za-z_][A-Za-z0-9_-]*)+$")
        .expect("valid reference regex")
});

/// Rewrites placeholders across a whole document.
#[derive(Debug, Clone)]
pub struct SecretRewriter {
    prefixes: Vec<String>,
}

impl SecretRewriter {
    /// Create a rewriter knowing only the builtin reference prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefixes: BUILTIN_REFERENCE_PREFIXES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }

    /// Treat `<resource_type>.` as a reference prefix.
    pub fn allow_resource_type(&mut self, resource_type: &str) {
        let prefix = format!("{resource_type}.");
        if !self.prefixes.contains(&prefix) {
            log::debug!("Reference prefix registered: {prefix}");
            self.prefixes.push(prefix);
        }
    }

    /// Check if an interpolated expression is a reference to keep as is.
    #[must_use]
    pub fn is_reference(&self, expression: &str) -> bool {
        self.prefixes.iter().any(|p| expression.starts_with(p.as_str()))
    }

    /// Rewrite every placeholder in `text`.
    ///
    /// - `${SOURCE_NAMESPACE}` becomes `$${SOURCE_NAMESPACE}`
    /// - `${NAME}` becomes `${var.NAME}`
    /// - `${<reference>}` is unchanged when its prefix is allowed
    /// - escaped `$${...}` sequences and expressions that are neither a name
    ///   nor a dotted reference are unchanged
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedReference`] for a dotted reference whose
    /// root is not allowed.
    pub fn rewrite(&self, text: &str) -> Result<String> {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;

        for caps in INTERPOLATION.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            output.push_str(&text[last..whole.start()]);
            output.push_str(&self.rewrite_one(&caps)?);
            last = whole.end();
        }

        output.push_str(&text[last..]);
        Ok(output)
    }

    fn rewrite_one(&self, caps: &Captures<'_>) -> Result<String> {
        let whole = &caps[0];
        if !caps[1].is_empty() {
            return Ok(whole.to_string());
        }

        let expression = caps[2].trim();
        if expression == SOURCE_NAMESPACE {
            return Ok(format!("$${{{SOURCE_NAMESPACE}}}"));
        }
        if IDENTIFIER.is_match(expression) {
            return Ok(format!("${{var.{expression}}}"));
        }
        if REFERENCE.is_match(expression) {
            if self.is_reference(expression) {
                return Ok(whole.to_string());
            }
            let root = expression.split('.').next().unwrap_or(expression);
            return Err(Error::UnresolvedReference {
                expression: expression.to_string(),
                root: root.to_string(),
            });
        }

        log::debug!("Leaving interpolation untouched: {whole}");
        Ok(whole.to_string())
    }
}

impl Default for SecretRewriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_becomes_variable() {
        let rewriter = SecretRewriter::new();
        assert_eq!(
            rewriter.rewrite(r#"api_key = "${STRIPE_API_KEY}""#).unwrap(),
            r#"api_key = "${var.STRIPE_API_KEY}""#
        );
    }

    #[test]
    fn test_builtin_references_unchanged() {
        let rewriter = SecretRewriter::new();
        let text = r#"a = "${var.WORKSPACE_ID}"
b = "${local.bigquery_gcp_project}-airbyte-ingestion"
c = "${data.google_secret_manager_secret_version.x.secret_data}""#;
        assert_eq!(rewriter.rewrite(text).unwrap(), text);
    }

    #[test]
    fn test_resource_references_need_registration() {
        let text = r#"source_id = "${airbyte_source_stripe.stripe.source_id}""#;

        let err = SecretRewriter::new().rewrite(text).unwrap_err();
        assert!(matches!(
            &err,
            Error::UnresolvedReference { root, .. } if root == "airbyte_source_stripe"
        ));

        let mut rewriter = SecretRewriter::new();
        rewriter.allow_resource_type("airbyte_source_stripe");
        assert_eq!(rewriter.rewrite(text).unwrap(), text);
    }

    #[test]
    fn test_unknown_root_rejected_next_to_valid_placeholders() {
        let mut rewriter = SecretRewriter::new();
        rewriter.allow_resource_type("airbyte_source_github");
        let text = r#"a = "${var.X}"
b = "${airbyte_source_github.r.source_id}"
c = "${unknown_thing.x.y}"
e = "${TOKEN}""#;

        let err = rewriter.rewrite(text).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unresolved reference `${unknown_thing.x.y}`: `unknown_thing` is not a known reference root"
        );

        rewriter.allow_resource_type("unknown_thing");
        assert_eq!(
            rewriter.rewrite(text).unwrap(),
            r#"a = "${var.X}"
b = "${airbyte_source_github.r.source_id}"
c = "${unknown_thing.x.y}"
e = "${var.TOKEN}""#
        );
    }

    #[test]
    fn test_non_reference_expressions_unchanged() {
        let rewriter = SecretRewriter::new();
        let text = r#"a = "${foo bar}"
b = "${upper(x)}"
c = "${}""#;
        assert_eq!(rewriter.rewrite(text).unwrap(), text);
    }

    #[test]
    fn test_source_namespace_escaped() {
        let rewriter = SecretRewriter::new();
        assert_eq!(
            rewriter
                .rewrite(r#"namespace_format = "${SOURCE_NAMESPACE}""#)
                .unwrap(),
            r#"namespace_format = "$${SOURCE_NAMESPACE}""#
        );
    }

    #[test]
    fn test_escaped_sequences_unchanged() {
        let rewriter = SecretRewriter::new();
        let text = r#"namespace_format = "$${SOURCE_NAMESPACE}_raw"
raw = "$${unknown_thing.x}""#;
        assert_eq!(rewriter.rewrite(text).unwrap(), text);
    }

    #[test]
    fn test_multiple_placeholders_in_one_string() {
        let rewriter = SecretRewriter::new();
        assert_eq!(
            rewriter
                .rewrite(r#"dsn = "${USER}:${PASSWORD}@${var.HOST}""#)
                .unwrap(),
            r#"dsn = "${var.USER}:${var.PASSWORD}@${var.HOST}""#
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let mut rewriter = SecretRewriter::new();
        rewriter.allow_resource_type("airbyte_source_github");
        let text = r#"token = "${GITHUB_TOKEN}"
ns = "${SOURCE_NAMESPACE}"
id = "${airbyte_source_github.repo.source_id}""#;

        let once = rewriter.rewrite(text).unwrap();
        assert_eq!(rewriter.rewrite(&once).unwrap(), once);
    }

    #[test]
    fn test_allow_resource_type_deduplicates() {
        let mut rewriter = SecretRewriter::new();
        rewriter.allow_resource_type("airbyte_connection");
        rewriter.allow_resource_type("airbyte_connection");
        assert_eq!(
            rewriter.prefixes.len(),
            BUILTIN_REFERENCE_PREFIXES.len() + 1
        );
        assert!(rewriter.is_reference("airbyte_connection.sync.connection_id"));
    }
}

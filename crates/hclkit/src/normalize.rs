//! Whole-document normalization passes.
//!
//! The passes run in a fixed order, each a pure text transform. Every pass
//! is idempotent, so normalizing an already normalized document returns it
//! unchanged.

use crate::secrets::REFERENCE;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Credentials block substituted for OAuth credentials on GitHub products.
pub const PERSONAL_ACCESS_TOKEN_CREDENTIALS: &str =
    "credentials = { personal_access_token = { personal_access_token = var.ACCESS_TOKEN } }";

/// Resource types the provider renamed: `(deprecated, replacement)`.
pub const RENAMED_RESOURCE_TYPES: &[(&str, &str)] =
    &[("airbyte_source_declarative_manifest", "airbyte_source_custom")];

static QUOTED_INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""\$\{([^{}"]*)\}""#).expect("valid quoted interpolation regex")
});

static DETACHED_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\n\{").expect("valid detached brace regex"));

static ADJACENT_LISTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]([ \t]*\n[ \t]*)\[").expect("valid adjacent list regex"));

static ADJACENT_OBJECTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}([ \t]*\n[ \t]*)\{").expect("valid adjacent object regex"));

static OAUTH_CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"credentials[ \t]*=[ \t]*\{[^{}]*"OAuth Credentials"[^{}]*\}"#)
        .expect("valid oauth credentials regex")
});

static DEFINITION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)definition_id\b").expect("valid definition id regex")
});

static EMPTY_LIST_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*(?:[A-Za-z_][A-Za-z0-9_-]*|"[^"\n]*")[ \t]*=[ \t]*\[[ \t]*\][ \t]*,?[ \t]*(?:\n|$)"#)
        .expect("valid empty list regex")
});

/// Ordered set of document rewrites.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    personal_access_token: bool,
}

impl Normalizer {
    /// Create a normalizer with every optional pass disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace OAuth credentials with a personal access token.
    #[must_use]
    pub fn with_personal_access_token(mut self, enabled: bool) -> Self {
        self.personal_access_token = enabled;
        self
    }

    /// Apply every pass, in order.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let mut output = strip_interpolation_quotes(text);
        output = attach_detached_braces(&output);
        output = separate_adjacent_literals(&output);
        if self.personal_access_token {
            output = use_personal_access_token(&output);
        }
        output = comment_out_definition_id(&output);
        output = rename_deprecated_types(&output);
        remove_empty_lists(&output)
    }
}

/// `"${ref}"` becomes `ref` when the string is nothing but the interpolation
/// and `ref` is a dotted reference. Anything else, including the source
/// namespace placeholder, stays a string.
#[must_use]
pub fn strip_interpolation_quotes(text: &str) -> String {
    QUOTED_INTERPOLATION
        .replace_all(text, |caps: &Captures<'_>| {
            let expression = caps[1].trim();
            if REFERENCE.is_match(expression) {
                expression.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// A `{` opening a line is pulled up onto the header line before it.
#[must_use]
pub fn attach_detached_braces(text: &str) -> String {
    DETACHED_BRACE.replace_all(text, " {").into_owned()
}

/// Adjacent tuple or object literals on consecutive lines get a comma.
#[must_use]
pub fn separate_adjacent_literals(text: &str) -> String {
    let output = ADJACENT_LISTS.replace_all(text, "],${1}[");
    ADJACENT_OBJECTS.replace_all(&output, "},${1}{").into_owned()
}

/// OAuth credential objects become a personal access token credential.
#[must_use]
pub fn use_personal_access_token(text: &str) -> String {
    OAUTH_CREDENTIALS
        .replace_all(text, PERSONAL_ACCESS_TOKEN_CREDENTIALS)
        .into_owned()
}

/// `definition_id` attributes are commented out.
///
/// The provider plans a replacement of imported resources whenever
/// `definition_id` is set (terraform-provider-airbyte issue #88).
#[must_use]
pub fn comment_out_definition_id(text: &str) -> String {
    DEFINITION_ID
        .replace_all(text, "${1}# definition_id")
        .into_owned()
}

/// Deprecated resource type names are replaced.
#[must_use]
pub fn rename_deprecated_types(text: &str) -> String {
    let mut output = text.to_string();
    for (deprecated, replacement) in RENAMED_RESOURCE_TYPES {
        output = output.replace(deprecated, replacement);
    }
    output
}

/// Attributes set to `[]` are dropped: the provider reads an empty list as
/// a value, while the API reports unset lists as empty.
#[must_use]
pub fn remove_empty_lists(text: &str) -> String {
    EMPTY_LIST_ATTRIBUTE.replace_all(text, "").into_owned()
}

//! Top-level and nested configuration blocks.

use crate::value::{Body, Value};

/// A block such as `resource "type" "label" { ... }`.
///
/// Attributes are written before nested blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block type keyword (`resource`, `import`, `variable`, ...).
    pub keyword: String,
    /// Quoted labels following the keyword.
    pub labels: Vec<String>,
    /// Attributes.
    pub body: Body,
    /// Nested blocks.
    pub blocks: Vec<Block>,
}

impl Block {
    /// Create an empty block.
    pub fn new<I, S>(keyword: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyword: keyword.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            body: Body::new(),
            blocks: Vec::new(),
        }
    }

    /// `resource "<resource_type>" "<label>"`
    #[must_use]
    pub fn resource(resource_type: &str, label: &str) -> Self {
        Self::new("resource", [resource_type, label])
    }

    /// Set an attribute, builder style.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.set(key, value);
        self
    }

    /// Replace the attributes, builder style.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Append a nested block, builder style.
    #[must_use]
    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

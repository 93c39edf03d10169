//! Error types for document passes.

/// Result type alias for document passes.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rewriting a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dotted interpolation whose root is neither a Terraform namespace
    /// nor a resource type of the document.
    #[error("unresolved reference `${{{expression}}}`: `{root}` is not a known reference root")]
    UnresolvedReference {
        /// The interpolated expression.
        expression: String,
        /// Its first segment.
        root: String,
    },
}

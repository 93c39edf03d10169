//! Error types for synthesis.
//!
//! There is no warning tier: every inconsistency between the checkout and
//! the environments stops the run before anything is written.

use registry::ResourceKind;

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synthesizing a configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// More than one remote resource shares a name within an environment.
    #[error("{kind} `{name}` is ambiguous: several matches in {}", .environments.join(", "))]
    AmbiguousResource {
        /// Kind of the resource.
        kind: ResourceKind,
        /// Logical resource name.
        name: String,
        /// Every environment holding more than one match.
        environments: Vec<String>,
    },

    /// A connection references a source that was never emitted.
    #[error("connection `{connection}` references source {source_id}, which was not synthesized")]
    UnresolvedSourceReference {
        /// Connection name.
        connection: String,
        /// Remote id of the referenced source.
        source_id: String,
    },

    /// A resource has no counterpart in an environment that needs one.
    #[error("{kind} `{name}` not found in environment `{environment}`")]
    MissingMatch {
        /// Kind of the resource.
        kind: ResourceKind,
        /// Logical resource name.
        name: String,
        /// Environment lacking the resource.
        environment: String,
    },

    /// Talking to an environment's registry failed.
    #[error("registry call failed for environment `{environment}`: {source}")]
    Registry {
        /// Environment whose registry failed.
        environment: String,
        /// Underlying registry error.
        #[source]
        source: registry::Error,
    },

    /// A checkout file or a registry object lacks a required field.
    #[error("invalid configuration for `{resource}`: {message}")]
    InvalidConfig {
        /// Resource label or name.
        resource: String,
        /// What is wrong.
        message: String,
    },

    /// An environment is not part of the tracked set.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// The assembled document references something it does not declare.
    #[error("generated document is invalid: {0}")]
    Document(#[from] hclkit::Error),
}

impl Error {
    /// Create an invalid configuration error.
    pub fn invalid_config(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Wrap a registry error with the environment it came from.
    pub fn registry(environment: impl Into<String>, source: registry::Error) -> Self {
        Self::Registry {
            environment: environment.into(),
            source,
        }
    }
}

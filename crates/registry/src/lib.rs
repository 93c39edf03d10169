//! # registry
//!
//! Read-only client for the resources of an Airbyte deployment.
//!
//! This crate provides:
//! - [`ResourceRecord`]s for sources, destinations and connections, with
//!   their raw configuration kept in insertion order
//! - the [`Registry`] trait, implemented over HTTP by
//!   [`backend::airbyte::HttpRegistry`]
//! - the [`SecretsCatalog`] trait, implemented for GitHub repository secrets
//!   by [`backend::github::GitHubSecrets`]
//! - in-memory mocks for both traits
//!
//! ## Example
//!
//! ```no_run
//! use registry::{HttpRegistry, Registry, ResourceKind};
//!
//! let registry = HttpRegistry::new("https://airbyte.example.com", "client", "secret");
//! let workspace = registry.default_workspace_id().expect("no workspace");
//!
//! for kind in ResourceKind::all() {
//!     let records = registry.list(*kind, &workspace).expect("listing failed");
//!     println!("{}: {}", kind.plural(), records.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::airbyte::HttpRegistry;
pub use backend::github::GitHubSecrets;
pub use backend::{MockRegistry, MockSecrets, Registry, SecretsCatalog};
pub use error::{Error, Result};
pub use types::{ResourceKind, ResourceRecord, Workspace};

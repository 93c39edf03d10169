//! # Declarative
//!
//! Synthesis of one importable Terraform configuration from the Airbyte
//! resources of several environments.
//!
//! The same generated file describes the existing resources and, through
//! environment-conditional `import` blocks, binds to the right remote
//! identifiers whichever environment it is applied to.
//!
//! ## Core Concepts
//!
//! - **EnvironmentSet**: the tracked environments and the reference one
//! - **Snapshot**: every listing, fetched once per environment and kind
//! - **MatchGroup**: one logical resource and its record per environment
//! - **DeclarativeBlock**: a resource block with ordered attributes
//! - **ImportBinding**: the `import` directive preceding each block
//! - **Synthesizer**: the run assembling, rewriting and normalizing the
//!   document
//!
//! ## Example
//!
//! ```
//! use declarative::{EnvironmentSet, ResourceFile, Snapshot, Synthesizer};
//! use registry::{MockRegistry, Registry, ResourceKind, ResourceRecord};
//! use serde_json::json;
//! use std::collections::{BTreeSet, HashMap};
//!
//! let envs = EnvironmentSet::new(["dev", "prod"], "prod")?;
//!
//! let mut registries: HashMap<String, Box<dyn Registry>> = HashMap::new();
//! for env in envs.iter() {
//!     let registry = MockRegistry::new()
//!         .with_record(ResourceRecord::new(
//!             ResourceKind::Destination,
//!             format!("dst-{env}"),
//!             "BigQuery",
//!             json!({}),
//!         ))
//!         .with_record(ResourceRecord::new(
//!             ResourceKind::Source,
//!             format!("src-{env}"),
//!             "Orders API",
//!             json!({}),
//!         ));
//!     registries.insert(env.to_string(), Box::new(registry));
//! }
//! let snapshot = Snapshot::fetch(&envs, &registries)?;
//!
//! let files = [ResourceFile::new(
//!     ResourceKind::Source,
//!     "orders api",
//!     json!({
//!         "resource_name": "Orders API",
//!         "definition_image": "airbyte/source-orders",
//!         "configuration": { "api_key": "${ORDERS_API_KEY}" }
//!     }),
//! )];
//! let secrets = BTreeSet::new();
//! let text = Synthesizer::new(&envs, &snapshot, "glb_orders", &secrets).run(&files)?;
//!
//! assert!(text.contains(r#"lookup({ dev = "src-dev", prod = "src-prod" }, var.ENV)"#));
//! assert!(text.contains("resource \"airbyte_source_orders\" \"orders_api\""));
//! assert!(text.contains("api_key = var.ORDERS_API_KEY"));
//! # Ok::<(), declarative::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! Remote access goes through [`registry::Registry`], and progress through
//! [`ProgressCallback`], so the engine runs unchanged against mocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod context;
pub mod emitter;
pub mod environment;
pub mod error;
pub mod links;
pub mod pipeline;
pub mod preamble;
pub mod resolver;
pub mod resource_file;
pub mod snapshot;

pub use binding::{ImportBinding, bind};
pub use context::{NoProgress, ProgressCallback};
pub use emitter::{
    DeclarativeBlock, EmitContext, emit_connection, emit_connector, resource_label,
    resource_type_from_image, sync_mode,
};
pub use environment::EnvironmentSet;
pub use error::{Error, Result};
pub use links::SourceLinkTable;
pub use pipeline::{Synthesizer, is_github_product};
pub use preamble::Preamble;
pub use resolver::{MatchGroup, resolve};
pub use resource_file::ResourceFile;
pub use snapshot::Snapshot;

//! # hclkit
//!
//! Building blocks for generating Terraform configuration text.
//!
//! This crate provides:
//! - A [`Value`] tree with insertion-ordered [`Body`] objects, convertible
//!   from `serde_json` values
//! - [`Block`]s and a serializer ([`writer`])
//! - An append-only [`OutputBuffer`] for assembling a document
//! - Whole-document passes: [`SecretRewriter`] and [`Normalizer`]
//!
//! ## Example
//!
//! ```
//! use hclkit::{Block, Normalizer, OutputBuffer, SecretRewriter, Value};
//!
//! let mut out = OutputBuffer::new();
//! out.push_block(
//!     &Block::resource("airbyte_source_stripe", "stripe")
//!         .attr("client_secret", "${STRIPE_SECRET}")
//!         .attr("workspace_id", Value::interpolation("var.WORKSPACE_ID")),
//! );
//!
//! let text = SecretRewriter::new().rewrite(&out.finish())?;
//! let text = Normalizer::new().normalize(&text);
//!
//! assert!(text.contains("client_secret = var.STRIPE_SECRET"));
//! assert!(text.contains("workspace_id = var.WORKSPACE_ID"));
//! # Ok::<(), hclkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod buffer;
pub mod error;
pub mod normalize;
pub mod secrets;
pub mod value;
pub mod writer;

pub use block::Block;
pub use buffer::OutputBuffer;
pub use error::{Error, Result};
pub use normalize::Normalizer;
pub use secrets::{SOURCE_NAMESPACE, SecretRewriter};
pub use value::{Body, Value};

//! Environment-conditional import directives.
//!
//! One `import` block precedes each resource block. It maps every tracked
//! environment to the remote id of the resource there and selects the entry
//! for `var.ENV`:
//!
//! ```text
//! import {
//!   for_each = toset([lookup({ dev = "src-dev-1", prod = "src-prod-1" }, var.ENV)])
//!   to = airbyte_source_orders.orders_api
//!   id = each.value
//! }
//! ```
//!
//! `lookup` without a default fails on an environment missing from the map,
//! so an unexpected `ENV` is an error instead of a silent fallback.

use crate::environment::EnvironmentSet;
use crate::error::Result;
use crate::resolver::MatchGroup;
use hclkit::{Block, Value, writer};

/// Variable selecting the environment at plan time.
pub const ENV_VARIABLE: &str = "var.ENV";

/// Import directive for one block address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Address of the bound block.
    pub address: String,
    /// Environment and remote id, in environment order.
    pub ids: Vec<(String, String)>,
}

impl ImportBinding {
    /// Remote id bound for an environment.
    #[must_use]
    pub fn id_for(&self, env: &str) -> Option<&str> {
        self.ids
            .iter()
            .find(|(e, _)| e == env)
            .map(|(_, id)| id.as_str())
    }

    /// The `for_each` expression.
    #[must_use]
    pub fn selector(&self) -> String {
        let entries: Vec<String> = self
            .ids
            .iter()
            .map(|(env, id)| format!("{} = {}", writer::attribute_key(env), writer::quote(id)))
            .collect();
        format!(
            "toset([lookup({{ {} }}, {ENV_VARIABLE})])",
            entries.join(", ")
        )
    }

    /// The `import` block.
    #[must_use]
    pub fn to_block(&self) -> Block {
        Block::new("import", std::iter::empty::<String>())
            .attr("for_each", Value::expr(self.selector()))
            .attr("to", Value::expr(&self.address))
            .attr("id", Value::expr("each.value"))
    }

    /// Serialized `import` block.
    #[must_use]
    pub fn render(&self) -> String {
        writer::write_string(&self.to_block())
    }
}

/// Bind a block address to the group's id in every environment.
///
/// # Errors
///
/// Returns `Error::MissingMatch` for the first environment without a
/// record.
pub fn bind(address: &str, group: &MatchGroup, envs: &EnvironmentSet) -> Result<ImportBinding> {
    let ids = envs
        .iter()
        .map(|env| Ok((env.to_string(), group.require(env)?.id.clone())))
        .collect::<Result<Vec<_>>>()?;

    Ok(ImportBinding {
        address: address.to_string(),
        ids,
    })
}

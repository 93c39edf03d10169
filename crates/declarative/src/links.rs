//! Remote source ids to synthesized block addresses.

use std::collections::HashMap;

/// Maps every environment's source id to the address of its block.
///
/// Filled while sources are emitted, read while connections are emitted.
#[derive(Debug, Clone, Default)]
pub struct SourceLinkTable {
    addresses: HashMap<String, String>,
}

impl SourceLinkTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a remote id to a block address.
    pub fn register(&mut self, source_id: impl Into<String>, address: impl Into<String>) {
        let (source_id, address) = (source_id.into(), address.into());
        log::debug!("Source {source_id} -> {address}");
        self.addresses.insert(source_id, address);
    }

    /// Address of the block synthesized for a remote id.
    #[must_use]
    pub fn address_of(&self, source_id: &str) -> Option<&str> {
        self.addresses.get(source_id).map(String::as_str)
    }

    /// Number of linked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Check if nothing is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut links = SourceLinkTable::new();
        assert!(links.is_empty());

        links.register("src-dev-1", "airbyte_source_orders.Orders_API");
        links.register("src-prod-1", "airbyte_source_orders.Orders_API");

        assert_eq!(links.len(), 2);
        assert_eq!(
            links.address_of("src-prod-1"),
            Some("airbyte_source_orders.Orders_API")
        );
        assert_eq!(links.address_of("src-qa-1"), None);
    }
}

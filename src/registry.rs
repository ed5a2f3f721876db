use alloy_primitives::Address;
use std::collections::HashSet;

/// Set of discovered token contracts. Addresses are compared as raw 20-byte
/// values, so two textual spellings of the same address can never produce
/// two entries. Iteration follows insertion order for deterministic output.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    seen: HashSet<Address>,
    order: Vec<Address>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the address was not seen before.
    pub fn add(&mut self, address: Address) -> bool {
        let is_new = self.seen.insert(address);
        if is_new {
            self.order.push(address);
        }
        is_new
    }

    pub fn entries(&self) -> &[Address] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

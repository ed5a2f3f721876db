use crate::chain::ChainReader;
use crate::registry::TokenRegistry;
use alloy_primitives::Address;
use tracing::warn;

/// Reported in place of the name when the `name()` call fails.
pub const NAME_UNAVAILABLE: &str = "<name unavailable>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub address: Address,
    pub name: String,
}

/// Fetches the display name of every registered token. One token's failure
/// never blocks the others; the output follows registry order.
pub async fn enrich<C: ChainReader>(client: &C, registry: &TokenRegistry) -> Vec<TokenRecord> {
    let mut records = Vec::with_capacity(registry.len());
    for &address in registry.entries() {
        let name = match client.token_name(address).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to fetch name for token {}: {}", address, e);
                NAME_UNAVAILABLE.to_string()
            }
        };
        records.push(TokenRecord { address, name });
    }
    records
}

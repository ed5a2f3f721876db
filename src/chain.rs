use alloy_primitives::{Address, B256, Bytes};
use anyhow::Result;
use async_trait::async_trait;

/// The fields of a transaction the scanning pipeline cares about.
/// `to` is `None` for contract-creation transactions.
#[derive(Debug, Clone)]
pub struct TxData {
    pub hash: B256,
    pub to: Option<Address>,
    pub input: Bytes,
}

/// A block with its full transaction list, projected out of whatever
/// transport representation the chain client uses.
#[derive(Debug, Clone)]
pub struct BlockData {
    pub number: u64,
    pub transactions: Vec<TxData>,
}

/// Read-only view of the chain. The scanner and enricher depend on this
/// trait only, so tests can substitute an in-memory chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn latest_block_number(&self) -> Result<u64>;

    /// Returns `None` when the node does not have the block.
    async fn block_with_transactions(&self, number: u64) -> Result<Option<BlockData>>;

    /// ERC-20 `name()` of the contract at `address`.
    async fn token_name(&self, address: Address) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::calldata::APPROVE_SELECTOR;
    use alloy_primitives::U256;
    use std::collections::{HashMap, HashSet};

    /// In-memory chain with scriptable failures.
    #[derive(Debug, Default)]
    pub struct MockChain {
        pub latest: u64,
        pub blocks: HashMap<u64, Vec<TxData>>,
        pub fail_blocks: HashSet<u64>,
        pub names: HashMap<Address, String>,
        pub fail_names: HashSet<Address>,
    }

    #[async_trait]
    impl ChainReader for MockChain {
        async fn latest_block_number(&self) -> Result<u64> {
            Ok(self.latest)
        }

        async fn block_with_transactions(&self, number: u64) -> Result<Option<BlockData>> {
            if self.fail_blocks.contains(&number) {
                anyhow::bail!("injected fetch failure for block {number}");
            }
            Ok(self.blocks.get(&number).map(|txs| BlockData {
                number,
                transactions: txs.clone(),
            }))
        }

        async fn token_name(&self, address: Address) -> Result<String> {
            if self.fail_names.contains(&address) {
                anyhow::bail!("execution reverted");
            }
            self.names
                .get(&address)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no name for {address}"))
        }
    }

    pub fn approve_calldata(spender: Address, amount: U256) -> Bytes {
        let mut data = Vec::with_capacity(68);
        data.extend_from_slice(&APPROVE_SELECTOR);
        data.extend_from_slice(&[0u8; 12]);
        data.extend_from_slice(spender.as_slice());
        data.extend_from_slice(&amount.to_be_bytes::<32>());
        data.into()
    }

    pub fn approve_tx(seed: u8, to: Address, input: Bytes) -> TxData {
        TxData {
            hash: B256::repeat_byte(seed),
            to: Some(to),
            input,
        }
    }
}

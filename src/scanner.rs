use crate::calldata::{decode_approve, is_approve_call};
use crate::chain::{BlockData, ChainReader, TxData};
use crate::config::Config;
use crate::registry::TokenRegistry;
use alloy_primitives::Address;
use anyhow::Result;
use futures::future::join_all;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Inclusive range of block heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    /// The `window` most recent blocks ending at `latest`, clamped at
    /// genesis: `start = max(0, latest - window + 1)`.
    pub fn trailing(latest: u64, window: u64) -> Self {
        let start = latest.saturating_sub(window.saturating_sub(1));
        BlockRange { start, end: latest }
    }

    /// Consecutive sub-ranges of at most `size` blocks, ascending, covering
    /// the range exactly once.
    pub fn batches(&self, size: u64) -> Vec<BlockRange> {
        assert!(size > 0, "batch size must be positive");
        let mut out = Vec::new();
        let mut start = self.start;
        while start <= self.end {
            let end = start.saturating_add(size - 1).min(self.end);
            out.push(BlockRange { start, end });
            match end.checked_add(1) {
                Some(next) => start = next,
                None => break,
            }
        }
        out
    }

    pub fn count(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Walks a block range batch by batch and collects every token contract
/// that received an `approve` for the target spender.
pub struct Scanner<'a, C> {
    client: &'a C,
    spender: Address,
    batch_size: u64,
    batch_delay: Duration,
}

impl<'a, C: ChainReader> Scanner<'a, C> {
    pub fn new(client: &'a C, config: &Config) -> Self {
        Scanner {
            client,
            spender: config.target_spender,
            batch_size: config.batch_size,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }

    pub async fn scan(&self, range: BlockRange) -> Result<TokenRegistry> {
        let mut registry = TokenRegistry::new();
        let batches = range.batches(self.batch_size);

        info!(
            "Scanning blocks {} to {} ({} blocks, {} batches)",
            range.start,
            range.end,
            range.count(),
            batches.len()
        );

        for (index, batch) in batches.iter().enumerate() {
            info!(
                "Batch {}/{}: fetching blocks {} to {}",
                index + 1,
                batches.len(),
                batch.start,
                batch.end
            );

            // Fan out one fetch per height, then wait for the whole batch.
            // In-flight requests are bounded by the batch size.
            let fetches =
                (batch.start..=batch.end).map(|height| self.client.block_with_transactions(height));
            let results = join_all(fetches).await;

            for (height, result) in (batch.start..=batch.end).zip(results) {
                let block = match result {
                    Ok(Some(block)) => block,
                    Ok(None) => {
                        warn!("Block {} not available, treating as empty", height);
                        continue;
                    }
                    Err(e) => {
                        warn!("Failed to fetch block {}: {}", height, e);
                        continue;
                    }
                };
                self.process_block(&block, &mut registry);
            }

            if index + 1 < batches.len() && !self.batch_delay.is_zero() {
                sleep(self.batch_delay).await;
            }
        }

        Ok(registry)
    }

    fn process_block(&self, block: &BlockData, registry: &mut TokenRegistry) {
        for tx in &block.transactions {
            let Some(token) = self.approved_token(tx) else {
                continue;
            };
            if registry.add(token) {
                info!(
                    "Discovered token {} (approve in tx {} at block {})",
                    token, tx.hash, block.number
                );
            }
        }
    }

    /// Matcher, decoder and spender filter composed: the token contract
    /// address when this transaction approves the target spender.
    fn approved_token(&self, tx: &TxData) -> Option<Address> {
        if !is_approve_call(tx) {
            return None;
        }
        match decode_approve(&tx.input) {
            Ok(call) if call.spender == self.spender => tx.to,
            Ok(_) => None,
            Err(e) => {
                debug!("Skipping undecodable approve-like tx {}: {}", tx.hash, e);
                None
            }
        }
    }
}

use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::str::FromStr;

pub const DEFAULT_WINDOW_SIZE: u64 = 100;
pub const DEFAULT_BATCH_SIZE: u64 = 10;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub target_spender: Address,
    /// Number of most-recent blocks to scan.
    pub window_size: u64,
    /// Blocks fetched concurrently per batch.
    pub batch_size: u64,
    /// Pause between batches, rate-limit mitigation.
    pub batch_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let rpc_url = std::env::var("RPC_URL").context("RPC_URL must be set in .env")?;

        let spender_str =
            std::env::var("TARGET_SPENDER").context("TARGET_SPENDER must be set in .env")?;
        let target_spender = Address::from_str(&spender_str)
            .context("TARGET_SPENDER is not a valid 20-byte address")?;

        let window_size = env_or("WINDOW_SIZE", DEFAULT_WINDOW_SIZE)?;
        let batch_size = env_or("BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        let batch_delay_ms = env_or("BATCH_DELAY_MS", DEFAULT_BATCH_DELAY_MS)?;

        let config = Config {
            rpc_url,
            target_spender,
            window_size,
            batch_size,
            batch_delay_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            anyhow::bail!("WINDOW_SIZE must be a positive integer");
        }
        if self.batch_size == 0 {
            anyhow::bail!("BATCH_SIZE must be a positive integer");
        }
        Ok(())
    }
}

fn env_or(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{key} must be an unsigned integer, got {value:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn zero_window_or_batch_is_rejected() {
        let mut config = Config {
            rpc_url: "http://localhost:8545".to_string(),
            target_spender: address!("000000000022d473030f116ddee9f6b43ac78ba3"),
            window_size: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay_ms: 0,
        };
        assert!(config.validate().is_err());

        config.window_size = DEFAULT_WINDOW_SIZE;
        config.batch_size = 0;
        assert!(config.validate().is_err());

        config.batch_size = DEFAULT_BATCH_SIZE;
        assert!(config.validate().is_ok());
    }
}

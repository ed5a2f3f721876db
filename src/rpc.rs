use crate::chain::{BlockData, ChainReader, TxData};
use alloy::consensus::Transaction as _;
use alloy::network::TransactionResponse as _;
use alloy::providers::fillers::FillProvider;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Block, BlockNumberOrTag, TransactionInput, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

sol! {
    function name() external view returns (string);
}

type AlloyFullProvider = FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::Identity,
        alloy::providers::fillers::JoinFill<
            alloy::providers::fillers::GasFiller,
            alloy::providers::fillers::JoinFill<
                alloy::providers::fillers::BlobGasFiller,
                alloy::providers::fillers::JoinFill<
                    alloy::providers::fillers::NonceFiller,
                    alloy::providers::fillers::ChainIdFiller,
                >,
            >,
        >,
    >,
    alloy::providers::RootProvider,
>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP JSON-RPC client. Transient failures are retried with exponential
/// backoff and jitter; every request carries a hard timeout.
#[derive(Clone)]
pub struct RpcClient {
    provider: AlloyFullProvider,
    url: String,
    max_retries: usize,
}

impl RpcClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let parsed_url = rpc_url
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid RPC URL: {}", rpc_url))?;
        let provider: AlloyFullProvider = ProviderBuilder::new().connect_http(parsed_url);

        Ok(RpcClient {
            provider,
            url: rpc_url.to_string(),
            max_retries: 5,
        })
    }

    /// Startup connectivity probe. Failure here is fatal for the whole run.
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .with_context(|| format!("cannot establish network identity via {}", self.url))
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(100)
            .factor(2)
            .max_delay(Duration::from_secs(10))
            .map(jitter)
            .take(self.max_retries)
    }

    fn timeout_error(&self) -> anyhow::Error {
        warn!(
            "Request timeout after {} seconds on {}",
            REQUEST_TIMEOUT.as_secs(),
            self.url
        );
        anyhow::anyhow!(
            "Request timeout after {} seconds",
            REQUEST_TIMEOUT.as_secs()
        )
    }

    pub async fn get_latest_block(&self) -> Result<u64> {
        let client = self.clone();
        Retry::spawn(self.retry_strategy(), move || {
            let client = client.clone();
            async move {
                match timeout(REQUEST_TIMEOUT, client.provider.get_block_number()).await {
                    Ok(Ok(block_number)) => Ok(block_number),
                    Ok(Err(e)) => {
                        warn!("RPC error on {}: {}", client.url, e);
                        Err(anyhow::anyhow!("{}", e))
                    }
                    Err(_) => Err(client.timeout_error()),
                }
            }
        })
        .await
    }

    pub async fn get_block(&self, number: u64) -> Result<Option<BlockData>> {
        let client = self.clone();
        Retry::spawn(self.retry_strategy(), move || {
            let client = client.clone();
            async move {
                let future = client
                    .provider
                    .get_block_by_number(BlockNumberOrTag::Number(number))
                    .full();

                match timeout(REQUEST_TIMEOUT, future).await {
                    Ok(Ok(block)) => Ok(block.map(project_block)),
                    Ok(Err(e)) => {
                        warn!("RPC error on {}: {}", client.url, e);
                        Err(anyhow::anyhow!("{}", e))
                    }
                    Err(_) => Err(client.timeout_error()),
                }
            }
        })
        .await
    }

    /// Read-only `eth_call` against `address`. Not retried: callers treat
    /// per-contract failures as tolerable.
    pub async fn call_contract<C: SolCall>(&self, address: Address, call: C) -> Result<C::Return> {
        let data = call.abi_encode();
        let tx = TransactionRequest::default()
            .to(address)
            .input(TransactionInput::new(data.into()));

        let raw = timeout(REQUEST_TIMEOUT, self.provider.call(tx))
            .await
            .map_err(|_| self.timeout_error())?
            .with_context(|| format!("eth_call to {address} failed"))?;

        let decoded = C::abi_decode_returns(&raw)
            .with_context(|| format!("cannot decode eth_call return data from {address}"))?;
        Ok(decoded)
    }
}

fn project_block(block: Block) -> BlockData {
    let number = block.header.number;
    let transactions = block
        .transactions
        .into_transactions()
        .map(|tx| TxData {
            hash: tx.tx_hash(),
            to: tx.inner.to(),
            input: tx.inner.input().clone(),
        })
        .collect();
    BlockData {
        number,
        transactions,
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn latest_block_number(&self) -> Result<u64> {
        self.get_latest_block().await
    }

    async fn block_with_transactions(&self, number: u64) -> Result<Option<BlockData>> {
        self.get_block(number).await
    }

    async fn token_name(&self, address: Address) -> Result<String> {
        let name = self.call_contract(address, nameCall {}).await?;
        info!("Token {} name: {}", address, name);
        Ok(name)
    }
}

use anyhow::{Context, Result};
use approval_scanner::config::Config;
use approval_scanner::enrich::enrich;
use approval_scanner::report::format_token_report;
use approval_scanner::rpc::RpcClient;
use approval_scanner::scanner::{BlockRange, Scanner};
use clap::Parser;
use std::str::FromStr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scanner")]
#[command(about = "Scan recent blocks for ERC-20 approvals to a target spender", long_about = None)]
struct Cli {
    /// Override RPC_URL from the environment
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override TARGET_SPENDER from the environment
    #[arg(long)]
    spender: Option<String>,

    /// Override WINDOW_SIZE (number of most-recent blocks to scan)
    #[arg(long)]
    window: Option<u64>,

    /// Override BATCH_SIZE (blocks fetched concurrently per batch)
    #[arg(long)]
    batch_size: Option<u64>,

    /// Override BATCH_DELAY_MS (pause between batches)
    #[arg(long)]
    batch_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("Scanner error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting approval scanner");

    let mut config = Config::from_env()?;
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(spender) = cli.spender {
        config.target_spender = alloy_primitives::Address::from_str(&spender)
            .context("--spender is not a valid 20-byte address")?;
    }
    if let Some(window) = cli.window {
        config.window_size = window;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(delay) = cli.batch_delay_ms {
        config.batch_delay_ms = delay;
    }
    config.validate()?;

    info!("Target spender: {}", config.target_spender);
    info!(
        "Window: {} blocks, batch size {}",
        config.window_size, config.batch_size
    );

    let client = RpcClient::new(&config.rpc_url)?;
    let chain_id = client.chain_id().await?;
    info!("Connected to chain id {}", chain_id);

    let latest = client.get_latest_block().await?;
    let range = BlockRange::trailing(latest, config.window_size);

    let scanner = Scanner::new(&client, &config);
    let registry = scanner.scan(range).await?;

    if registry.is_empty() {
        info!("Scan complete: no approvals found");
        println!("{}", format_token_report(&[]));
        return Ok(());
    }

    info!(
        "Scan complete: {} token(s) discovered, fetching names",
        registry.len()
    );
    let records = enrich(&client, &registry).await;
    println!("{}", format_token_report(&records));

    Ok(())
}

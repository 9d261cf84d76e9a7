//! Stand up a stable swap pool against the configured cluster

use anyhow::{Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::signature::Signer;
use stable_swap_client::{Config, PoolBootstrapper};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting stable swap pool bootstrap");

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using default localnet config", e);
        Config::default_localnet()
    });

    let commitment = config
        .commitment()
        .context("Invalid commitment level")?;
    let client = RpcClient::new_with_commitment(config.rpc_url.clone(), commitment);
    log::info!("Connected to RPC: {}", config.rpc_url);

    let timeout = Duration::from_secs(config.bootstrap_timeout_secs);
    let bootstrapper =
        PoolBootstrapper::new(&client, config).context("Failed to configure bootstrap")?;
    let pool = bootstrapper
        .run_with_timeout(timeout)
        .await
        .context("Pool bootstrap failed")?;

    log::info!("Stable swap program: {}", pool.program_id);
    log::info!("Stable swap:         {}", pool.swap);
    log::info!(
        "Authority:           {} (nonce {})",
        pool.authority.address(),
        pool.authority.nonce()
    );
    log::info!("Pool mint:           {}", pool.pool_mint);
    log::info!("Pool token account:  {}", pool.pool_token_account);
    log::info!("Mint A / reserve A:  {} / {}", pool.mint_a, pool.token_account_a);
    log::info!("Mint B / reserve B:  {} / {}", pool.mint_b, pool.token_account_b);
    log::info!("Payer:               {}", pool.payer.pubkey());
    log::info!("Owner:               {}", pool.owner.pubkey());
    if let Some(seeded) = pool.initial_deposit {
        log::info!(
            "Initial deposit {} into {}",
            seeded.signature,
            seeded.pool_token_account
        );
    }

    Ok(())
}

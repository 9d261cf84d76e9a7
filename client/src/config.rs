//! Bootstrap configuration

use crate::error::Error;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use std::path::PathBuf;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// RPC URL for the cluster
    pub rpc_url: String,

    /// Commitment level every transaction is confirmed at
    pub commitment: String,

    /// JSON file mapping program names to deployed addresses
    pub fixture_path: String,

    /// Key of the stable swap program in the fixture
    pub program_name: String,

    /// Compiled program deployed when the fixture has no entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_path: Option<String>,

    /// Lamports airdropped to the payer and to the owner
    pub account_lamports: u64,

    /// Upper bound on a whole bootstrap run
    pub bootstrap_timeout_secs: u64,

    pub pool: PoolParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_deposit: Option<InitialDeposit>,

    /// Airdrop balance polling
    pub funding: RetryPolicy,

    /// Signature status polling
    pub confirmation: RetryPolicy,

    /// Attempts per program chunk write
    pub chunk_upload: RetryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    pub amp_factor: u64,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    /// Decimals of the pool mint and both token mints
    pub decimals: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialDeposit {
    pub amount_a: u64,
    pub amount_b: u64,
    pub minimum_pool_tokens_out: u64,
}

impl Config {
    /// Load configuration from the TOML file named by `STABLE_SWAP_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("STABLE_SWAP_CONFIG")
            .unwrap_or_else(|_| "stable-swap-config.toml".to_string());
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(expand(path))
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config TOML")?;

        config
            .commitment()
            .context(format!("Invalid commitment in {}", path))?;

        Ok(config)
    }

    /// Defaults for a local test validator
    pub fn default_localnet() -> Self {
        Self {
            rpc_url: "http://localhost:8899".to_string(),
            commitment: "single".to_string(),
            fixture_path: "localnet-address.json".to_string(),
            program_name: "stableSwap".to_string(),
            program_path: None,
            account_lamports: LAMPORTS_PER_SOL,
            bootstrap_timeout_secs: 300,
            pool: PoolParams {
                amp_factor: 100,
                fee_numerator: 1,
                fee_denominator: 4,
                decimals: 2,
            },
            initial_deposit: None,
            funding: RetryPolicy::new(30, 500),
            confirmation: RetryPolicy::new(60, 500),
            chunk_upload: RetryPolicy::new(5, 500),
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_localnet();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(expand(path), toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }

    /// Parse `commitment`, accepting the legacy level names.
    pub fn commitment(&self) -> crate::Result<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" | "single" | "recent" => Ok(CommitmentConfig::processed()),
            "confirmed" | "singleGossip" => Ok(CommitmentConfig::confirmed()),
            "finalized" | "root" | "max" => Ok(CommitmentConfig::finalized()),
            other => Err(Error::Config(format!("unknown commitment level: {}", other))),
        }
    }

    pub fn fixture_path(&self) -> PathBuf {
        expand(&self.fixture_path)
    }

    pub fn program_path(&self) -> Option<PathBuf> {
        self.program_path.as_deref().map(expand)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

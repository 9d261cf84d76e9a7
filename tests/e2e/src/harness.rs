//! Test harness for E2E tests with solana-test-validator

use anyhow::{Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use stable_swap_client::{BootstrappedPool, Config, PoolBootstrapper, TransactionSubmitter};
use std::env;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

/// Compiled program, relative to the workspace root
pub const PROGRAM_SO: &str = "target/deploy/stable_swap.so";

/// Find solana binary in standard locations
fn find_solana_binary(name: &str) -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME not set")?;
    let standard_path = PathBuf::from(&home)
        .join(".local/share/solana/install/active_release/bin")
        .join(name);

    if standard_path.exists() {
        return Ok(standard_path);
    }

    // Fallback to PATH
    Ok(PathBuf::from(name))
}

fn workspace_root() -> Result<PathBuf> {
    let mut root = env::current_dir().context("Failed to get current directory")?;

    // cargo runs integration tests from the member directory
    if root.ends_with("tests/e2e") {
        root = root
            .parent()
            .and_then(|p| p.parent())
            .ok_or_else(|| anyhow::anyhow!("Failed to find workspace root"))?
            .to_path_buf();
    }
    Ok(root)
}

/// Test validator process handle
pub struct TestValidator {
    _process: Child,
    rpc_url: String,
}

impl TestValidator {
    /// Start a new test validator
    pub fn start() -> Result<Self> {
        println!("Starting solana-test-validator...");

        let validator_bin = find_solana_binary("solana-test-validator")?;
        let process = Command::new(&validator_bin)
            .arg("--reset")
            .arg("--quiet")
            .spawn()
            .context("Failed to start solana-test-validator")?;

        // Wait for validator to start
        thread::sleep(Duration::from_secs(3));

        Ok(Self {
            _process: process,
            rpc_url: "http://localhost:8899".to_string(),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn rpc_client(&self, commitment: CommitmentConfig) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), commitment)
    }
}

impl Drop for TestValidator {
    fn drop(&mut self) {
        println!("Stopping test validator...");
        if let Ok(validator_bin) = find_solana_binary("solana-test-validator") {
            let _ = Command::new(&validator_bin).arg("exit").output();
        }
    }
}

/// A validator with a freshly bootstrapped pool and no liquidity
pub struct TestContext {
    pub validator: TestValidator,
    pub client: RpcClient,
    pub config: Config,
    pub submitter: TransactionSubmitter,
    pub pool: BootstrappedPool,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let validator = TestValidator::start()?;

        let program_path = workspace_root()?.join(PROGRAM_SO);
        if !program_path.exists() {
            anyhow::bail!(
                "{} not found; build the stable swap program first",
                program_path.display()
            );
        }

        // The validator starts from --reset, so a fixture from an earlier
        // run would point at a program that no longer exists
        let fixture_path =
            env::temp_dir().join(format!("stable-swap-e2e-{}.json", std::process::id()));

        let mut config = Config::default_localnet();
        config.rpc_url = validator.rpc_url().to_string();
        config.fixture_path = fixture_path.to_string_lossy().into_owned();
        config.program_path = Some(program_path.to_string_lossy().into_owned());

        let client = validator.rpc_client(config.commitment()?);
        let timeout = Duration::from_secs(config.bootstrap_timeout_secs);

        println!("Bootstrapping pool...");
        let bootstrapper = PoolBootstrapper::new(&client, config.clone())?;
        let submitter = bootstrapper.submitter();
        let pool = bootstrapper
            .run_with_timeout(timeout)
            .await
            .context("Pool bootstrap failed")?;

        println!("Pool bootstrapped:");
        println!("  Program: {}", pool.program_id);
        println!("  Swap:    {}", pool.swap);
        println!("  Pool mint: {}", pool.pool_mint);

        Ok(Self {
            validator,
            client,
            config,
            submitter,
            pool,
        })
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(self.config.fixture_path());
    }
}

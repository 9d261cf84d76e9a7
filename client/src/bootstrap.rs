//! Pool bootstrap
//!
//! Stands up a complete stable swap pool on a fresh cluster: resolve or
//! deploy the program, fund a payer and an owner, derive the pool authority,
//! create the pool mint, the token mints and reserves, initialize the swap
//! and optionally seed it with an initial deposit.
//!
//! Steps run strictly in order, each consuming the output of the previous
//! ones. The first failing step aborts the run and is reported as
//! `Error::Bootstrap`. Accounts created by earlier steps are not closed and
//! remain on the ledger.

use crate::address::ProgramDerivedAddress;
use crate::config::{Config, InitialDeposit};
use crate::connection::Connection;
use crate::deployer::ProgramDeployer;
use crate::error::{Error, Result};
use crate::fixture::ProgramFixture;
use crate::funder::AccountFunder;
use crate::state::StableSwapState;
use crate::submitter::TransactionSubmitter;
use crate::swap::{NewStableSwap, StableSwap};
use crate::token;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use std::fmt;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    ResolveProgram,
    FundPayer,
    FundOwner,
    DeriveAuthority,
    CreatePoolMint,
    CreatePoolTokenAccount,
    CreateMintA,
    CreateReserveA,
    CreateMintB,
    CreateReserveB,
    CreateStableSwap,
    InitialDeposit,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapStep::ResolveProgram => "resolve program",
            BootstrapStep::FundPayer => "fund payer",
            BootstrapStep::FundOwner => "fund owner",
            BootstrapStep::DeriveAuthority => "derive authority",
            BootstrapStep::CreatePoolMint => "create pool mint",
            BootstrapStep::CreatePoolTokenAccount => "create pool token account",
            BootstrapStep::CreateMintA => "create mint A",
            BootstrapStep::CreateReserveA => "create reserve A",
            BootstrapStep::CreateMintB => "create mint B",
            BootstrapStep::CreateReserveB => "create reserve B",
            BootstrapStep::CreateStableSwap => "create stable swap",
            BootstrapStep::InitialDeposit => "initial deposit",
        };
        f.write_str(name)
    }
}

/// Accounts touched by the initial deposit
#[derive(Debug, Clone, Copy)]
pub struct SeededLiquidity {
    pub user_account_a: Pubkey,
    pub user_account_b: Pubkey,
    /// Receives the pool tokens minted by the deposit
    pub pool_token_account: Pubkey,
    pub signature: Signature,
}

/// Everything a bootstrap run created
#[derive(Debug)]
pub struct BootstrappedPool {
    pub payer: Keypair,
    /// Mint authority of token A and B, owner of the pool token account
    pub owner: Keypair,
    pub program_id: Pubkey,
    pub swap: Pubkey,
    pub authority: ProgramDerivedAddress,
    pub state: StableSwapState,
    pub pool_mint: Pubkey,
    pub pool_token_account: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub token_account_a: Pubkey,
    pub token_account_b: Pubkey,
    pub initial_deposit: Option<SeededLiquidity>,
}

impl BootstrappedPool {
    /// Client for the bootstrapped pool, paying fees from its payer.
    pub fn swap<'a, C: Connection + ?Sized>(
        &'a self,
        conn: &'a C,
        submitter: TransactionSubmitter,
    ) -> StableSwap<'a, C> {
        StableSwap::bound(
            conn,
            submitter,
            &self.payer,
            self.swap,
            self.authority,
            self.state,
        )
    }
}

pub struct PoolBootstrapper<'a, C: ?Sized> {
    conn: &'a C,
    config: Config,
    submitter: TransactionSubmitter,
    funder: AccountFunder,
    deployer: ProgramDeployer,
}

impl<'a, C: Connection + ?Sized> PoolBootstrapper<'a, C> {
    pub fn new(conn: &'a C, config: Config) -> Result<Self> {
        let submitter = TransactionSubmitter::new(config.commitment()?, config.confirmation);
        let funder = AccountFunder::new(config.funding);
        let deployer = ProgramDeployer::new(submitter, funder, config.chunk_upload);
        Ok(Self {
            conn,
            config,
            submitter,
            funder,
            deployer,
        })
    }

    pub fn submitter(&self) -> TransactionSubmitter {
        self.submitter
    }

    /// Run every step, bounded by `timeout` overall.
    pub async fn run_with_timeout(&self, timeout: Duration) -> Result<BootstrappedPool> {
        match tokio::time::timeout(timeout, self.run()).await {
            Ok(result) => result,
            Err(_) => {
                log::error!("Bootstrap did not finish within {:?}", timeout);
                Err(Error::BootstrapTimeout(timeout))
            }
        }
    }

    pub async fn run(&self) -> Result<BootstrappedPool> {
        let conn = self.conn;
        let submitter = &self.submitter;
        let pool_params = self.config.pool;
        let lamports = self.config.account_lamports;
        let token_program_id = spl_token::id();

        let program_id = run_step(BootstrapStep::ResolveProgram, self.resolve_program()).await?;

        let payer = Keypair::new();
        run_step(
            BootstrapStep::FundPayer,
            self.funder.fund(conn, &payer.pubkey(), lamports),
        )
        .await?;

        let owner = Keypair::new();
        run_step(
            BootstrapStep::FundOwner,
            self.funder.fund(conn, &owner.pubkey(), lamports),
        )
        .await?;

        let state_account = Keypair::new();
        let authority = run_step(BootstrapStep::DeriveAuthority, async {
            ProgramDerivedAddress::swap_authority(&state_account.pubkey(), &program_id)
        })
        .await?;
        log::info!("Pool authority {} (nonce {})", authority.address(), authority.nonce());

        let pool_mint = run_step(
            BootstrapStep::CreatePoolMint,
            token::create_mint(
                conn,
                submitter,
                &payer,
                &authority.address(),
                pool_params.decimals,
                &token_program_id,
            ),
        )
        .await?;

        let pool_token_account = run_step(
            BootstrapStep::CreatePoolTokenAccount,
            token::create_account(
                conn,
                submitter,
                &payer,
                &pool_mint,
                &owner.pubkey(),
                &token_program_id,
            ),
        )
        .await?;

        let mint_a = run_step(
            BootstrapStep::CreateMintA,
            token::create_mint(
                conn,
                submitter,
                &payer,
                &owner.pubkey(),
                pool_params.decimals,
                &token_program_id,
            ),
        )
        .await?;

        let token_account_a = run_step(
            BootstrapStep::CreateReserveA,
            token::create_account(
                conn,
                submitter,
                &payer,
                &mint_a,
                &authority.address(),
                &token_program_id,
            ),
        )
        .await?;

        let mint_b = run_step(
            BootstrapStep::CreateMintB,
            token::create_mint(
                conn,
                submitter,
                &payer,
                &owner.pubkey(),
                pool_params.decimals,
                &token_program_id,
            ),
        )
        .await?;

        let token_account_b = run_step(
            BootstrapStep::CreateReserveB,
            token::create_account(
                conn,
                submitter,
                &payer,
                &mint_b,
                &authority.address(),
                &token_program_id,
            ),
        )
        .await?;

        let params = NewStableSwap {
            token_account_a,
            token_account_b,
            pool_mint,
            mint_a,
            mint_b,
            pool_token_account,
            token_program_id,
            amp_factor: pool_params.amp_factor,
            fee_numerator: pool_params.fee_numerator,
            fee_denominator: pool_params.fee_denominator,
        };
        let swap = run_step(
            BootstrapStep::CreateStableSwap,
            StableSwap::create(
                conn,
                self.submitter,
                &payer,
                &state_account,
                &authority,
                params,
            ),
        )
        .await?;

        let initial_deposit = match self.config.initial_deposit {
            Some(deposit) => Some(
                run_step(
                    BootstrapStep::InitialDeposit,
                    self.seed_liquidity(&swap, &payer, &owner, deposit),
                )
                .await?,
            ),
            None => None,
        };

        let state = *swap.state();
        let address = swap.address();
        log::info!("Bootstrapped stable swap {} (program {})", address, program_id);

        Ok(BootstrappedPool {
            payer,
            owner,
            program_id,
            swap: address,
            authority,
            state,
            pool_mint,
            pool_token_account,
            mint_a,
            mint_b,
            token_account_a,
            token_account_b,
            initial_deposit,
        })
    }

    /// Program address from the fixture, deploying and recording it when
    /// missing and a binary is configured.
    async fn resolve_program(&self) -> Result<Pubkey> {
        let name = &self.config.program_name;
        let fixture_path = self.config.fixture_path();
        let mut fixture = ProgramFixture::load(&fixture_path)?;

        if let Some(program_id) = fixture.get(name)? {
            log::info!("Using deployed {} program {}", name, program_id);
            return Ok(program_id);
        }

        let program_path = self
            .config
            .program_path()
            .ok_or_else(|| Error::ProgramNotDeployed(name.clone()))?;
        let binary = std::fs::read(&program_path)?;
        let program_id = self.deployer.deploy(self.conn, &binary).await?;

        fixture.insert(name, &program_id);
        fixture.save(&fixture_path)?;
        log::info!("Recorded {} program {} in {}", name, program_id, fixture_path.display());
        Ok(program_id)
    }

    /// Mint fresh A and B to the owner and deposit them into the pool.
    async fn seed_liquidity(
        &self,
        swap: &StableSwap<'_, C>,
        payer: &Keypair,
        owner: &Keypair,
        deposit: InitialDeposit,
    ) -> Result<SeededLiquidity> {
        let conn = self.conn;
        let submitter = &self.submitter;
        let token_program_id = swap.state().token_program_id;

        let mut user_accounts = Vec::with_capacity(2);
        for (mint, amount) in [
            (swap.state().mint_a, deposit.amount_a),
            (swap.state().mint_b, deposit.amount_b),
        ] {
            let account = token::create_account(
                conn,
                submitter,
                payer,
                &mint,
                &owner.pubkey(),
                &token_program_id,
            )
            .await?;
            token::mint_to(
                conn,
                submitter,
                payer,
                &mint,
                &account,
                owner,
                amount,
                &token_program_id,
            )
            .await?;
            user_accounts.push(account);
        }
        let (user_account_a, user_account_b) = (user_accounts[0], user_accounts[1]);

        let pool_token_account = token::create_account(
            conn,
            submitter,
            payer,
            &swap.pool_mint(),
            &owner.pubkey(),
            &token_program_id,
        )
        .await?;

        let signature = swap
            .deposit(
                owner,
                &user_account_a,
                &user_account_b,
                &pool_token_account,
                deposit.amount_a,
                deposit.amount_b,
                deposit.minimum_pool_tokens_out,
            )
            .await?;

        Ok(SeededLiquidity {
            user_account_a,
            user_account_b,
            pool_token_account,
            signature,
        })
    }
}

async fn run_step<T>(step: BootstrapStep, work: impl Future<Output = Result<T>>) -> Result<T> {
    log::info!("Bootstrap: {}", step);
    work.await.map_err(|e| {
        log::error!("Bootstrap step '{}' failed: {}", step, e);
        e.during(step)
    })
}

//! Test utilities for E2E tests

use crate::harness::TestContext;
use anyhow::Result;
use solana_sdk::{pubkey::Pubkey, signature::Signer};
use stable_swap_client::token;

pub const ONE_SOL: u64 = 1_000_000_000;

/// Owner accounts for one depositor
pub struct UserAccounts {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    /// Empty pool token account receiving minted pool tokens
    pub pool_tokens: Pubkey,
}

/// Create owner accounts for A, B and pool tokens, minting `amount_a` and
/// `amount_b` into the first two.
pub async fn funded_user_accounts(
    ctx: &TestContext,
    amount_a: u64,
    amount_b: u64,
) -> Result<UserAccounts> {
    let pool = &ctx.pool;
    let owner = pool.owner.pubkey();
    let token_program_id = pool.state.token_program_id;

    let mut accounts = Vec::with_capacity(2);
    for (mint, amount) in [(pool.mint_a, amount_a), (pool.mint_b, amount_b)] {
        let account = token::create_account(
            &ctx.client,
            &ctx.submitter,
            &pool.payer,
            &mint,
            &owner,
            &token_program_id,
        )
        .await?;
        token::mint_to(
            &ctx.client,
            &ctx.submitter,
            &pool.payer,
            &mint,
            &account,
            &pool.owner,
            amount,
            &token_program_id,
        )
        .await?;
        accounts.push(account);
    }

    let pool_tokens = token::create_account(
        &ctx.client,
        &ctx.submitter,
        &pool.payer,
        &pool.pool_mint,
        &owner,
        &token_program_id,
    )
    .await?;

    Ok(UserAccounts {
        token_a: accounts[0],
        token_b: accounts[1],
        pool_tokens,
    })
}

/// Token balances of `accounts`, in order
pub async fn token_balances(ctx: &TestContext, accounts: &[Pubkey]) -> Result<Vec<u64>> {
    let mut balances = Vec::with_capacity(accounts.len());
    for account in accounts {
        balances.push(token::token_balance(&ctx.client, account).await?);
    }
    Ok(balances)
}

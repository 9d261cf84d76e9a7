//! Pool tests against a live validator
//!
//! Run in order on one bootstrapped pool: the slippage test relies on the
//! pool still being empty for the deposit test that follows it.

use crate::{harness::TestContext, utils::*};
use anyhow::{ensure, Result};
use solana_sdk::signature::{Keypair, Signer};
use stable_swap_client::{
    AccountFunder, Error, ProgramDerivedAddress, RetryPolicy, StableSwap,
};

/// Loading the created pool returns the fields it was created with.
pub async fn test_load_round_trip(ctx: &TestContext) -> Result<()> {
    println!("\n=== Load round trip ===");
    let pool = &ctx.pool;

    let loaded = StableSwap::load(
        &ctx.client,
        ctx.submitter,
        &pool.swap,
        &pool.program_id,
        &pool.payer,
    )
    .await?;

    ensure!(loaded.token_account_a() == pool.token_account_a, "token account A differs");
    ensure!(loaded.token_account_b() == pool.token_account_b, "token account B differs");
    ensure!(loaded.pool_mint() == pool.pool_mint, "pool mint differs");
    ensure!(loaded.mint_a() == pool.mint_a, "mint A differs");
    ensure!(loaded.mint_b() == pool.mint_b, "mint B differs");
    ensure!(loaded.amp_factor() == ctx.config.pool.amp_factor, "amp factor differs");
    ensure!(loaded.fee_numerator() == ctx.config.pool.fee_numerator, "fee numerator differs");
    ensure!(
        loaded.fee_denominator() == ctx.config.pool.fee_denominator,
        "fee denominator differs"
    );
    ensure!(loaded.authority() == &pool.authority, "authority differs");

    println!("✓ Loaded pool matches created pool");
    Ok(())
}

/// The stored nonce re-derives the authority the pool was created with.
pub async fn test_authority_rederives(ctx: &TestContext) -> Result<()> {
    println!("\n=== Authority derivation ===");
    let pool = &ctx.pool;

    let rederived =
        ProgramDerivedAddress::with_nonce(&[pool.swap.as_ref()], pool.state.nonce, &pool.program_id)?;

    ensure!(rederived == pool.authority, "stored nonce derives a different authority");
    println!("✓ Authority {} (nonce {})", rederived.address(), rederived.nonce());
    Ok(())
}

/// A non-pool account is rejected instead of decoded.
pub async fn test_load_rejects_foreign_account(ctx: &TestContext) -> Result<()> {
    println!("\n=== Load foreign account ===");
    let pool = &ctx.pool;

    let result = StableSwap::load(
        &ctx.client,
        ctx.submitter,
        &pool.pool_mint,
        &pool.program_id,
        &pool.payer,
    )
    .await;

    ensure!(
        matches!(result, Err(Error::Decode(_))),
        "expected a decode error loading the pool mint"
    );
    println!("✓ Pool mint rejected");
    Ok(())
}

/// A funded account holds exactly the requested lamports.
pub async fn test_funding_exact_balance(ctx: &TestContext) -> Result<()> {
    println!("\n=== Funding ===");
    let account = Keypair::new();

    let funded = AccountFunder::new(RetryPolicy::new(30, 500))
        .fund(&ctx.client, &account.pubkey(), ONE_SOL)
        .await?;
    let observed = ctx.client.get_balance(&account.pubkey()).await?;

    ensure!(funded == ONE_SOL, "fund returned {}", funded);
    ensure!(observed == ONE_SOL, "ledger reports {}", observed);
    println!("✓ {} funded with {} lamports", account.pubkey(), observed);
    Ok(())
}

/// A deposit that cannot mint the requested minimum moves nothing.
pub async fn test_deposit_slippage(ctx: &TestContext) -> Result<()> {
    println!("\n=== Deposit slippage ===");
    let pool = &ctx.pool;
    let user = funded_user_accounts(ctx, ONE_SOL, ONE_SOL).await?;
    let tracked = [
        user.token_a,
        user.token_b,
        pool.token_account_a,
        pool.token_account_b,
        user.pool_tokens,
    ];
    let before = token_balances(ctx, &tracked).await?;

    let result = pool
        .swap(&ctx.client, ctx.submitter)
        .deposit(
            &pool.owner,
            &user.token_a,
            &user.token_b,
            &user.pool_tokens,
            ONE_SOL,
            ONE_SOL,
            u64::MAX,
        )
        .await;

    ensure!(
        matches!(result, Err(Error::SlippageExceeded)),
        "expected SlippageExceeded, got {:?}",
        result
    );
    let after = token_balances(ctx, &tracked).await?;
    ensure!(before == after, "balances changed: {:?} -> {:?}", before, after);

    println!("✓ Slippage relayed, balances unchanged");
    Ok(())
}

/// First deposit into the empty pool moves both amounts and mints one pool token.
pub async fn test_initial_deposit(ctx: &TestContext) -> Result<()> {
    println!("\n=== Initial deposit ===");
    let pool = &ctx.pool;
    let user = funded_user_accounts(ctx, ONE_SOL, ONE_SOL).await?;
    let reserves = [pool.token_account_a, pool.token_account_b];
    let reserves_before = token_balances(ctx, &reserves).await?;

    pool.swap(&ctx.client, ctx.submitter)
        .deposit(
            &pool.owner,
            &user.token_a,
            &user.token_b,
            &user.pool_tokens,
            ONE_SOL,
            ONE_SOL,
            0,
        )
        .await?;

    let sources = token_balances(ctx, &[user.token_a, user.token_b]).await?;
    let reserves_after = token_balances(ctx, &reserves).await?;
    let minted = token_balances(ctx, &[user.pool_tokens]).await?;

    ensure!(sources == [0, 0], "sources not drained: {:?}", sources);
    ensure!(
        reserves_after == [reserves_before[0] + ONE_SOL, reserves_before[1] + ONE_SOL],
        "reserves {:?} -> {:?}",
        reserves_before,
        reserves_after
    );
    ensure!(minted == [1], "minted {:?} pool tokens", minted);

    println!("✓ Deposited {} A and {} B", ONE_SOL, ONE_SOL);
    Ok(())
}

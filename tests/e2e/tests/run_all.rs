//! Run all E2E tests
//!
//! Deploys the compiled stable swap program to a local test-validator,
//! bootstraps a pool and exercises it.
//!
//! Needs `solana-test-validator` and `target/deploy/stable_swap.so`:
//! `cargo test -p stable-swap-e2e-tests -- --ignored`

use solana_sdk::signature::Signer;
use stable_swap_e2e_tests::*;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires solana-test-validator and the compiled stable swap program"]
async fn run_all_e2e_tests() {
    println!("\n");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Stable Swap End-to-End Test Suite");
    println!("═══════════════════════════════════════════════════════════");

    println!("\nInitializing test environment...");
    let ctx = match TestContext::new().await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("❌ Failed to initialize test context: {:#}", e);
            eprintln!("Make sure solana-test-validator is installed and ports are available");
            panic!("Test setup failed");
        }
    };

    println!("\n✓ Test environment ready");
    println!("  RPC URL: {}", ctx.validator.rpc_url());
    println!("  Payer: {}", ctx.pool.payer.pubkey());

    let mut passed = 0;
    let mut failed = 0;

    println!("\n━━━ Track 1: Pool State ━━━");

    match test_pool::test_load_round_trip(&ctx).await {
        Ok(_) => passed += 1,
        Err(e) => {
            eprintln!("❌ load round trip FAILED: {:#}", e);
            failed += 1;
        }
    }

    match test_pool::test_authority_rederives(&ctx).await {
        Ok(_) => passed += 1,
        Err(e) => {
            eprintln!("❌ authority derivation FAILED: {:#}", e);
            failed += 1;
        }
    }

    match test_pool::test_load_rejects_foreign_account(&ctx).await {
        Ok(_) => passed += 1,
        Err(e) => {
            eprintln!("❌ load foreign account FAILED: {:#}", e);
            failed += 1;
        }
    }

    match test_pool::test_funding_exact_balance(&ctx).await {
        Ok(_) => passed += 1,
        Err(e) => {
            eprintln!("❌ funding FAILED: {:#}", e);
            failed += 1;
        }
    }

    println!("\n━━━ Track 2: Liquidity ━━━");

    match test_pool::test_deposit_slippage(&ctx).await {
        Ok(_) => passed += 1,
        Err(e) => {
            eprintln!("❌ deposit slippage FAILED: {:#}", e);
            failed += 1;
        }
    }

    match test_pool::test_initial_deposit(&ctx).await {
        Ok(_) => passed += 1,
        Err(e) => {
            eprintln!("❌ initial deposit FAILED: {:#}", e);
            failed += 1;
        }
    }

    println!("\n═══════════════════════════════════════════════════════════");
    println!("  Test Summary");
    println!("═══════════════════════════════════════════════════════════");
    println!("  ✅ Passed:  {}", passed);
    println!("  ❌ Failed:  {}", failed);
    println!("  📊 Total:   {}", passed + failed);
    println!("═══════════════════════════════════════════════════════════\n");

    if failed > 0 {
        panic!("{} test(s) failed", failed);
    }
}

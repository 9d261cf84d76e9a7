//! Stable Swap E2E Tests
//!
//! End-to-end tests against solana-test-validator with the compiled stable
//! swap program deployed through the client's own deployer.

pub mod harness;
pub mod test_pool;
pub mod utils;

pub use harness::*;

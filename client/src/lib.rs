//! Stable Swap Client
//!
//! Client-side orchestration for the stable swap AMM program: derive the pool
//! authority, fund fresh accounts, submit and confirm transactions, deploy the
//! program, and create, load and trade against a pool.
//!
//! Every operation takes an explicit [`Connection`]; nothing holds a global
//! cluster handle.

pub mod address;
pub mod bootstrap;
pub mod config;
pub mod connection;
pub mod deployer;
pub mod error;
pub mod fixture;
pub mod funder;
pub mod instruction;
pub mod retry;
pub mod state;
pub mod submitter;
pub mod swap;
pub mod token;


pub use address::ProgramDerivedAddress;
pub use bootstrap::{BootstrapStep, BootstrappedPool, PoolBootstrapper, SeededLiquidity};
pub use config::{Config, InitialDeposit, PoolParams};
pub use connection::Connection;
pub use deployer::ProgramDeployer;
pub use error::{Error, Result};
pub use fixture::ProgramFixture;
pub use funder::AccountFunder;
pub use retry::RetryPolicy;
pub use state::StableSwapState;
pub use submitter::TransactionSubmitter;
pub use swap::{NewStableSwap, StableSwap, SwapDirection};

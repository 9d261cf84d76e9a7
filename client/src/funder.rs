//! Faucet funding for fresh accounts

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicU64, Ordering};

/// Requests airdrops and waits for them to become visible.
#[derive(Debug, Clone, Copy)]
pub struct AccountFunder {
    policy: RetryPolicy,
}

impl AccountFunder {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Airdrop `lamports` to `address` and poll until the observed balance is
    /// exactly `lamports`.
    ///
    /// The match is exact: the address is expected to be fresh and funded only
    /// through this call. A pre-existing balance or a concurrent transfer
    /// into the same address makes the balance overshoot, and the call then
    /// fails with `FundingTimeout` once the poll budget is spent.
    pub async fn fund<C: Connection + ?Sized>(
        &self,
        conn: &C,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<u64> {
        let airdrop = conn.request_airdrop(address, lamports).await?;
        log::debug!("Requested {} lamports for {} ({})", lamports, address, airdrop);

        let last_seen = AtomicU64::new(0);
        let last_seen = &last_seen;
        let funded = self
            .policy
            .poll(move |_| async move {
                let balance = conn.get_balance(address).await?;
                last_seen.store(balance, Ordering::Relaxed);
                Ok((balance == lamports).then_some(balance))
            })
            .await?;

        match funded {
            Some(balance) => {
                log::debug!("{} funded with {} lamports", address, balance);
                Ok(balance)
            }
            None => Err(Error::FundingTimeout {
                address: *address,
                expected: lamports,
                observed: last_seen.load(Ordering::Relaxed),
                attempts: self.policy.max_attempts,
            }),
        }
    }
}

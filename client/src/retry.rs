//! Bounded polling shared by funding, confirmation and chunk uploads

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Fixed-interval retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Number of times the probe runs before giving up
    pub max_attempts: u32,

    /// Sleep between consecutive attempts, in milliseconds
    pub interval_ms: u64,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, interval_ms: u64) -> Self {
        Self {
            max_attempts,
            interval_ms,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Run `probe` until it yields `Some`, at most `max_attempts` times.
    ///
    /// The probe receives the 1-based attempt number. `Ok(None)` means the
    /// budget ran out; an `Err` from the probe is returned immediately
    /// without further attempts.
    pub async fn poll<T, F, Fut>(&self, mut probe: F) -> Result<Option<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = probe(attempt).await? {
                return Ok(Some(value));
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval()).await;
            }
        }
        Ok(None)
    }
}

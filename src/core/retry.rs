//! Bounded retry for external calls.
//!
//! Every external call is attempted once, with at most one re-attempt for
//! a transient failure. There is no backoff schedule beyond a fixed delay.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry policy for external-service calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first try)
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_delay_ms: 500,
        }
    }
}

impl RetryPolicy {
    /// Check if another attempt is allowed after `attempt` attempts
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before the next attempt
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Run `op`, re-attempting per policy when it fails
    pub async fn run<T, F, Fut>(&self, call: &str, mut op: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(attempt) => {
                    warn!(call, attempt, error = %e, "External call failed, retrying");
                    tokio::time::sleep(self.delay()).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

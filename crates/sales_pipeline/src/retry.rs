//! Caller-level retry wrapper for pipeline steps.

use crate::Result;
use sales_core::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-count, fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// retries are used up. The last error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt <= self.retries => {
                    warn!(
                        attempt,
                        retries = self.retries,
                        delay_secs = self.delay.as_secs(),
                        error = %err,
                        "Step failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.retries, config.delay())
    }
}

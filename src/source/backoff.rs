//! Exponential backoff for throttled discovery calls.

use crate::error::{Error, Result};

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How a backend waits out a rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitBackoff {
    /// Wait before the first retry.
    pub initial: Duration,
    /// Upper bound for any single wait.
    pub max: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
}

impl Default for RateLimitBackoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(2),
            max: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl RateLimitBackoff {
    /// Wait before retry number `retry` (0-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial.saturating_mul(factor).min(self.max)
    }

    /// Run `op` until it succeeds, fails with anything but a rate limit, or
    /// the retry budget is spent.
    ///
    /// The last rate-limit error is returned once retries are exhausted.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Err(e @ Error::RateLimited { .. }) if retry < self.max_retries => {
                    let wait = self.delay(retry);
                    warn!("{}; retrying in {:?}", e, wait);
                    tokio::time::sleep(wait).await;
                    retry += 1;
                }
                other => return other,
            }
        }
    }
}

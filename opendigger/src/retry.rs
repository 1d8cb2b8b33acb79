use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::FetchError;

/// Linear backoff for transient failures.
///
/// Attempt `n` (zero-based) waits `base_delay * (n + 1)`, doubled after a
/// timeout, never more than `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, attempt: u32, error: &FetchError) -> Duration {
        let mut delay = self.base_delay.saturating_mul(attempt.saturating_add(1));
        if matches!(error, FetchError::Timeout { .. }) {
            delay = delay.saturating_mul(2);
        }
        delay.min(self.max_delay)
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && e.is_transient() => {
                    let delay = self.delay_for(attempt, &e);
                    warn!("attempt {} failed: {e}; retrying in {delay:?}", attempt + 1);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

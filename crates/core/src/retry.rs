//! Fixed-delay bounded retry.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// An explicit retry policy: a fixed number of attempts with a constant
/// delay in between. No backoff, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// The policy used across the pipeline: 3 attempts, 2 seconds apart.
    pub fn standard() -> Self {
        Self::new(3, Duration::from_secs(2))
    }

    /// Run `op` until it succeeds or attempts are exhausted, returning the
    /// last error.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    warn!(attempt, error = %e, "Attempt failed, retrying");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

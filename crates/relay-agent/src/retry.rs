use relay_core::RelayResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Configures bounded exponential-backoff retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 mean a single attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Maximum delay in milliseconds (cap for exponential backoff).
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    60_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

/// Computes the backoff delay for a given 0-based attempt using exponential
/// backoff capped at `backoff_max_ms`.
pub fn compute_backoff(policy: &RetryPolicy, attempt: u32) -> u64 {
    let delay = policy
        .backoff_base_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    delay.min(policy.backoff_max_ms)
}

impl RetryPolicy {
    /// Delay to wait after the failed 0-based `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(compute_backoff(self, attempt))
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. Sleeps with `tokio::time::sleep` between attempts.
    pub async fn run<T, F, Fut>(&self, op: F) -> RelayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RelayResult<T>>,
    {
        self.run_with_sleep(op, tokio::time::sleep).await
    }

    /// Like [`RetryPolicy::run`], with the sleep between attempts supplied by the caller.
    ///
    /// Only errors for which [`relay_core::RelayError::is_retryable`] holds are
    /// retried; anything else is returned immediately. When every attempt fails
    /// the last error is returned.
    pub async fn run_with_sleep<T, F, Fut, S, SFut>(&self, mut op: F, mut sleep: S) -> RelayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RelayResult<T>>,
        S: FnMut(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        let attempts = self.attempts();
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempt + 1 >= attempts {
                        warn!(attempts, error = %e, "Retries exhausted");
                        return Err(e);
                    }
                    let delay = self.delay_for(attempt);
                    info!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retryable error, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

use relay_core::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Limiter settings as they appear in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum calls admitted within one window.
    #[serde(default = "default_max_calls")]
    pub max_calls: usize,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_calls() -> usize {
    10
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: default_max_calls(),
            window_secs: default_window_secs(),
        }
    }
}

/// Sliding-window rate limiter.
///
/// Keeps the timestamps of admitted calls in chronological order. Each
/// admission check first evicts timestamps older than the window from the
/// front, then admits only if fewer than `max_calls` remain.
///
/// There is no internal locking: [`RateLimiter::admit`] takes `&mut self`, so
/// a limiter shared between concurrent callers must be serialized externally.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: VecDeque<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

impl RateLimiter {
    /// Create a new rate limiter.
    /// - `max_calls`: calls admitted per window
    /// - `window`: length of the sliding window
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: VecDeque::new(),
        }
    }

    /// Create a limiter from its config-file representation.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_calls, Duration::from_secs(config.window_secs))
    }

    /// Try to admit one call now.
    ///
    /// Fails with a local [`RelayError::RateLimited`] when the window is full.
    pub fn admit(&mut self) -> RelayResult<()> {
        self.admit_at(Instant::now())
    }

    /// Try to admit one call at `now`.
    pub fn admit_at(&mut self, now: Instant) -> RelayResult<()> {
        self.evict_expired(now);

        if self.calls.len() >= self.max_calls {
            warn!(
                max_calls = self.max_calls,
                window_secs = self.window.as_secs(),
                "Local rate limit reached"
            );
            return Err(RelayError::local_rate_limit(self.max_calls, self.window));
        }

        self.calls.push_back(now);
        debug!(
            in_window = self.calls.len(),
            max_calls = self.max_calls,
            "Call admitted"
        );
        Ok(())
    }

    /// Number of admitted calls currently retained in the window.
    pub fn in_window(&self) -> usize {
        self.calls.len()
    }

    /// Configured call limit.
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Configured window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some(&oldest) = self.calls.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }
}

//! Bounded retry of transient target-platform failures.
//!
//! Only [`PlatformError::Transient`] is retried. Rejections are answers, not
//! failures, and surface as `Ok(PlatformResponse::Rejected { .. })`, so they are
//! never retried either.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_FACTOR,
    DEFAULT_RETRY_MAX_DELAY_MS,
};
use crate::platform::PlatformError;

/// Exponential backoff parameters.
///
/// The n-th delay is `base_delay_ms^n * factor` milliseconds, capped at
/// `max_delay_ms`. The defaults give 1s, 2s, 4s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, the first call included. `0` behaves like `1`.
    pub max_attempts: usize,
    /// Exponential base in milliseconds
    pub base_delay_ms: u64,
    /// Multiplier applied to every delay
    pub factor: u64,
    /// Upper bound of a single delay
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            factor: DEFAULT_RETRY_FACTOR,
            max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries `max_attempts - 1` times without sleeping.
    pub const fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            factor: 1,
            max_delay_ms: 0,
        }
    }

    /// The delays slept between attempts, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(self.base_delay_ms)
            .factor(self.factor)
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .take(self.max_attempts.saturating_sub(1))
    }

    /// Run `action` until it succeeds, fails non-transiently, or attempts run out.
    ///
    /// The last error is returned once attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, operation: &str, action: F) -> Result<T, PlatformError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlatformError>>,
    {
        let mut attempt = 1usize;
        let strategy = self.delays().map(move |delay| {
            attempt += 1;
            warn!("Retrying {} (attempt {}) in {:?}", operation, attempt, delay);
            delay
        });

        RetryIf::spawn(strategy, action, |e: &PlatformError| {
            let transient = e.is_transient();
            if !transient {
                debug!("Not retrying {}: {}", operation, e);
            }
            transient
        })
        .await
    }
}

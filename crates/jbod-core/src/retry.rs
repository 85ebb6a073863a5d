//! Bounded retry of optimistic-concurrency transactions
//!
//! A write rejected for carrying a stale resource version is the only
//! failure worth repeating: re-reading picks up the newer record and the
//! transaction can be applied again. Everything else is returned as-is.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};

use crate::{Error, Result};

/// Attempt budget and delay schedule for conflict retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    /// Jitter applied to each delay, as a fraction of the delay.
    pub randomization_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_interval: Duration::from_millis(10),
            multiplier: 2.0,
            max_interval: Duration::from_secs(1),
            randomization_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Retry without sleeping between attempts.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            initial_interval: Duration::ZERO,
            multiplier: 1.0,
            max_interval: Duration::ZERO,
            randomization_factor: 0.0,
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_multiplier(self.multiplier)
            .with_max_interval(self.max_interval)
            .with_randomization_factor(self.randomization_factor)
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Run `transaction` until it succeeds, fails with something other than a
/// conflict, or the attempt budget is spent.
///
/// The closure receives the 1-based attempt number and must perform the
/// whole read-modify-write cycle on every call.
pub async fn retry_on_conflict<T, F, Fut>(
    policy: &RetryPolicy,
    name: &str,
    mut transaction: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = policy.backoff();
    let mut attempt = 1;
    loop {
        match transaction(attempt).await {
            Err(Error::Registry(e)) if e.is_conflict() => {
                if attempt >= policy.attempts {
                    return Err(Error::RetryExhausted {
                        name: name.to_string(),
                        attempts: attempt,
                        source: e,
                    });
                }
                let delay = backoff.next_backoff().unwrap_or(policy.max_interval);
                tracing::debug!(drive = %name, attempt, ?delay, "Update conflicted, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

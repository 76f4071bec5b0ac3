//! Retry logic with linear backoff for single upstream requests.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::errors::{MarketDataError, RetryClass};

/// Retry budget and backoff for one kind of upstream request.
///
/// The delay before retry `n` (1-based) is `n × base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Base interval of the linear backoff.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with linear backoff.
    pub const fn linear(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Disable retries.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Calculate the delay before the given retry attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// retry budget of `policy` is spent.
///
/// Only errors classified as [`RetryClass::WithBackoff`] are retried.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error)
                if attempt < policy.max_retries
                    && error.retry_class() == RetryClass::WithBackoff =>
            {
                attempt += 1;
                let delay = policy.delay_for_attempt(attempt);
                debug!(
                    "{} failed ({}), retry {}/{} in {:?}",
                    label, error, attempt, policy.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportFailureKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn timeout() -> MarketDataError {
        MarketDataError::transport("TEST", TransportFailureKind::Timeout, "timed out")
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::linear(3, Duration::from_millis(100));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(300));
    }

    #[test]
    fn test_no_retry() {
        let policy = RetryPolicy::none();

        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.delay_for_attempt(5), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_retries_transient_failures_until_budget_spent() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::linear(3, Duration::from_millis(1));

        let result: Result<(), _> = retry_with_backoff(&policy, "RSI", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(timeout()) }
        })
        .await;

        assert!(result.unwrap_err().is_transport());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::linear(2, Duration::from_millis(1));

        let result = retry_with_backoff(&policy, "GLOBAL_QUOTE", || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(timeout())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::linear(3, Duration::from_millis(1));

        let result: Result<(), _> = retry_with_backoff(&policy, "SYMBOL_SEARCH", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(MarketDataError::transport(
                    "TEST",
                    TransportFailureKind::Status(404),
                    "not found",
                ))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Initial delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (e.g., 2.0 doubles the delay each time)
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset: primary translation provider.
    /// One retry (with sanitized text) after a short pause.
    pub fn primary_provider() -> Self {
        Self::new(2, Duration::from_millis(250)).with_max_delay(Duration::from_millis(250))
    }

    /// Calculate the delay for a given attempt number (0-indexed)
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::primary_provider()
    }
}

/// Execute an async operation with retries
///
/// The operation receives the 0-indexed attempt number, so a retry can change
/// what it sends (for example a cleaned-up payload) without smuggling state
/// into the payload itself.
///
/// # Returns
/// The result of the operation, or the last error if all attempts failed.
/// A `max_attempts` of 0 is treated as a single attempt.
pub async fn with_retry<T, E, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let delay = config.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: Retry attempt {}/{} after {:?}",
                operation_name,
                attempt + 1,
                max_attempts,
                delay
            );
            sleep(delay).await;
        }

        match operation(attempt).await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "{}: Succeeded on attempt {}/{}",
                        operation_name,
                        attempt + 1,
                        max_attempts
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                let remaining = max_attempts - attempt - 1;
                if remaining == 0 {
                    warn!(
                        "{}: All {} attempts failed. Last error: {}",
                        operation_name, max_attempts, e
                    );
                    return Err(e);
                }
                warn!(
                    "{}: Attempt {}/{} failed ({}), {} retries remaining",
                    operation_name,
                    attempt + 1,
                    max_attempts,
                    e,
                    remaining
                );
            }
        }

        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_retry_config_default_is_primary_provider() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.initial_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_retry_config_new_sets_defaults() {
        let config = RetryConfig::new(5, Duration::from_millis(100));

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert!((config.backoff_multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig::new(4, Duration::from_secs(1)).with_backoff_multiplier(2.0);

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_respects_max() {
        let config = RetryConfig::new(10, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(3))
            .with_backoff_multiplier(2.0);

        // Attempt 4 would be 8 seconds, but max is 3
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(3));
    }

    #[test]
    fn test_primary_provider_delays() {
        let config = RetryConfig::primary_provider();
        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_with_retry_succeeds_first_attempt() {
        let config = RetryConfig::new(3, Duration::from_millis(10));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<u32, &str> = with_retry(&config, "test", |_| {
            let c = counter_clone.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_passes_attempt_index() {
        let config = RetryConfig::new(3, Duration::from_millis(5));
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let result: Result<u32, &str> = with_retry(&config, "attempts", |attempt| {
            let seen = seen_clone.clone();
            async move {
                seen.lock().unwrap().push(attempt);
                if attempt < 2 {
                    Err("not yet")
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_with_retry_all_attempts_fail_returns_last_error() {
        let config = RetryConfig::new(3, Duration::from_millis(5));

        let result: Result<(), String> = with_retry(&config, "error_test", |attempt| async move {
            Err(format!("error on attempt {}", attempt + 1))
        })
        .await;

        assert_eq!(result.unwrap_err(), "error on attempt 3");
    }

    #[tokio::test]
    async fn test_with_retry_single_attempt_failure() {
        let config = RetryConfig::new(1, Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<i32, &str> = with_retry(&config, "single_attempt", |_| {
            let c = counter_clone.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("failure on first attempt")
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "failure on first attempt");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_zero_attempts_runs_once() {
        let config = RetryConfig::new(0, Duration::from_millis(100));
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), &str> = with_retry(&config, "zero_attempts", |_| {
            let c = counter_clone.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("boom")
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backoff_timing() {
        let config = RetryConfig::new(3, Duration::from_millis(50)).with_backoff_multiplier(2.0);

        let start = std::time::Instant::now();
        let _result: Result<(), &str> =
            with_retry(&config, "timing_test", |_| async { Err("always fails") }).await;
        let elapsed = start.elapsed();

        // 0ms + 50ms + 100ms
        assert!(
            elapsed >= Duration::from_millis(100),
            "Expected at least 100ms delay, got {:?}",
            elapsed
        );
        assert!(
            elapsed < Duration::from_millis(500),
            "Expected less than 500ms total, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_no_delay_on_immediate_success() {
        let config = RetryConfig::new(3, Duration::from_secs(10));

        let start = std::time::Instant::now();
        let result: Result<i32, &str> =
            with_retry(&config, "immediate_success", |_| async { Ok(42) }).await;

        assert!(result.is_ok());
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}

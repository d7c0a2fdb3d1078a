//! Circuit breaker guarding the fallback translation provider.
//!
//! ```text
//! CLOSED --(rate limit / forbidden)----------------> OPEN (long cooldown)
//! CLOSED --(failure_threshold other failures)------> OPEN (short cooldown)
//! OPEN   --(cooldown elapsed)----------------------> CLOSED
//! any    --(success)-------------------------------> CLOSED, counter = 0
//! ```
//!
//! There is no half-open probe: once the cooldown has elapsed the next call
//! simply goes through, and its outcome decides the next transition.

use crate::clock::{Clock, SystemClock};
use crate::error::ProviderError;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive ordinary failures that open the breaker
    pub failure_threshold: u32,
    /// Cooldown after `failure_threshold` ordinary failures
    pub cooldown: std::time::Duration,
    /// Cooldown after a rate-limit or forbidden response
    pub rate_limit_cooldown: std::time::Duration,
    /// Minimum spacing between "breaker is open" warnings
    pub warning_interval: std::time::Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown: std::time::Duration::from_secs(10 * 60),
            rate_limit_cooldown: std::time::Duration::from_secs(60 * 60),
            warning_interval: std::time::Duration::from_secs(5 * 60),
        }
    }
}

/// Snapshot of the breaker's mutable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitState {
    pub failure_count: u32,
    pub open_until: Option<DateTime<Utc>>,
    last_warning_at: Option<DateTime<Utc>>,
}

impl CircuitState {
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.open_until, Some(until) if now < until)
    }
}

pub struct CircuitBreaker {
    state: Mutex<CircuitState>,
    config: BreakerConfig,
    clock: Arc<dyn Clock>,
}

fn to_chrono(duration: std::time::Duration) -> Duration {
    Duration::from_std(duration).unwrap_or(Duration::MAX)
}

/// `now + cooldown`, saturating at the latest representable instant.
fn open_deadline(now: DateTime<Utc>, cooldown: std::time::Duration) -> DateTime<Utc> {
    now.checked_add_signed(to_chrono(cooldown))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: BreakerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CircuitState::default()),
            config,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CircuitState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open_at(self.clock.now())
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Check whether a call may go out right now.
    ///
    /// Rejections are reported at `warn` level at most once per
    /// `warning_interval`; the rest go to `debug`.
    pub fn allow_request(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.lock();
        let Some(until) = state.open_until.filter(|until| now < *until) else {
            return true;
        };

        let warn_due = state
            .last_warning_at
            .map_or(true, |last| now - last >= to_chrono(self.config.warning_interval));
        if warn_due {
            state.last_warning_at = Some(now);
            warn!(
                open_until = %until,
                "Fallback translator circuit is open, skipping calls until cooldown ends"
            );
        } else {
            debug!(open_until = %until, "Fallback translator circuit still open");
        }
        false
    }

    /// Record a successful call: zero the counter and close immediately.
    pub fn record_success(&self) {
        let mut state = self.lock();
        if state.open_until.is_some() || state.failure_count > 0 {
            info!(
                previous_failures = state.failure_count,
                "Fallback translator recovered, circuit closed"
            );
        }
        state.failure_count = 0;
        state.open_until = None;
    }

    /// Record a failed call. Returns `true` if this failure opened the breaker.
    pub fn record_failure(&self, error: &ProviderError) -> bool {
        let now = self.clock.now();
        let mut state = self.lock();

        if error.is_rate_limit() {
            let until = open_deadline(now, self.config.rate_limit_cooldown);
            // Never shorten a cooldown that is already running.
            state.open_until = Some(state.open_until.map_or(until, |current| current.max(until)));
            state.failure_count = 0;
            state.last_warning_at = Some(now);
            warn!(
                error = %error,
                cooldown_secs = self.config.rate_limit_cooldown.as_secs(),
                "Fallback translator rate limited, circuit opened"
            );
            return true;
        }

        if state.is_open_at(now) {
            debug!(error = %error, "Failure reported while circuit already open");
            return false;
        }

        state.failure_count += 1;
        if state.failure_count >= self.config.failure_threshold {
            state.open_until = Some(open_deadline(now, self.config.cooldown));
            state.failure_count = 0;
            state.last_warning_at = Some(now);
            warn!(
                error = %error,
                threshold = self.config.failure_threshold,
                cooldown_secs = self.config.cooldown.as_secs(),
                "Fallback translator failed repeatedly, circuit opened"
            );
            return true;
        }

        debug!(
            error = %error,
            failures = state.failure_count,
            threshold = self.config.failure_threshold,
            "Fallback translator failure recorded"
        );
        false
    }

    pub fn state(&self) -> CircuitState {
        self.lock().clone()
    }

    /// Close the breaker and forget past failures.
    pub fn reset(&self) {
        *self.lock() = CircuitState::default();
    }
}

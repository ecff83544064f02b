//! Exponential backoff schedule.

use std::time::Duration;

/// Configuration for the backoff policy.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Maximum number of attempts, counting the first one.
    pub num_of_attempts: u32,
    /// Delay before the first retry.
    pub starting_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub time_multiple: f64,
    /// Cap on a single delay. `None` lets the delay grow without bound.
    pub max_delay: Option<Duration>,
    /// Cap on the summed delays across all retries of one call.
    pub max_total_delay: Option<Duration>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            num_of_attempts: 10,
            starting_delay: Duration::from_millis(100),
            time_multiple: 2.0,
            max_delay: None,
            max_total_delay: None,
        }
    }
}

/// Stateless backoff policy: computes the delay before a given retry.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    pub config: BackoffConfig,
}

impl BackoffPolicy {
    pub fn new(config: BackoffConfig) -> Self {
        Self { config }
    }

    /// Delay to sleep after `failed_attempts` attempts have failed (1-based).
    ///
    /// Returns `None` once the attempt budget or the total delay budget is
    /// spent. `slept` is the delay already accumulated by earlier retries.
    pub fn next_delay(&self, failed_attempts: u32, slept: Duration) -> Option<Duration> {
        if failed_attempts == 0 || failed_attempts >= self.config.num_of_attempts {
            return None;
        }
        let base_ms = self.config.starting_delay.as_millis() as f64
            * self.config.time_multiple.powi((failed_attempts - 1) as i32);
        let capped_ms = match self.config.max_delay {
            Some(max) => base_ms.min(max.as_millis() as f64),
            None => base_ms,
        };
        // Saturate instead of overflowing on absurd multipliers.
        let delay = Duration::from_millis(capped_ms.min(u64::MAX as f64) as u64);

        if let Some(budget) = self.config.max_total_delay {
            if slept.saturating_add(delay) > budget {
                return None;
            }
        }
        Some(delay)
    }
}

//! Token bucket rate limiter.
//!
//! Models a token bucket: tokens accrue at `refill_rate` tokens/second up to
//! `capacity`, and the bucket starts full. Every request attempt consumes one
//! token. [`RateLimiter::acquire`] waits for a token instead of failing, and
//! waiters are served in the order they arrived.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ProAnalyticsError;

/// Rate limiter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterConfig {
    /// Maximum tokens in the bucket.
    pub capacity: f64,
    /// Token refill rate (tokens per second).
    pub refill_rate: f64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_interval(5, Duration::from_secs(1))
    }
}

impl RateLimiterConfig {
    /// `tokens` requests per `interval`, with a burst of at most `tokens`.
    pub fn per_interval(tokens: u32, interval: Duration) -> Self {
        let tokens = f64::from(tokens);
        Self {
            capacity: tokens,
            refill_rate: tokens / interval.as_secs_f64(),
        }
    }

    /// Rejects settings under which `acquire` could never return.
    pub fn validate(&self) -> Result<(), ProAnalyticsError> {
        if !(self.capacity >= 1.0 && self.capacity.is_finite()) {
            return Err(ProAnalyticsError::configuration(format!(
                "rate limiter capacity must be at least 1, got {}",
                self.capacity
            )));
        }
        if !(self.refill_rate > 0.0 && self.refill_rate.is_finite()) {
            return Err(ProAnalyticsError::configuration(format!(
                "rate limiter refill rate must be positive, got {}",
                self.refill_rate
            )));
        }
        Ok(())
    }
}

const MIN_WAIT: Duration = Duration::from_millis(1);

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Per-client token bucket shared by every request the client issues.
pub struct RateLimiter {
    config: RateLimiterConfig,
    // tokio's Mutex queues lockers fairly, which is what gives `acquire` its
    // FIFO ordering: the head of the queue sleeps while holding the lock.
    state: Mutex<BucketState>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: config.capacity,
                last_refill: Instant::now(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        loop {
            self.refill(&mut state);
            if state.tokens >= 1.0 {
                state.tokens -= 1.0;
                return;
            }
            let wait = self.deficit_wait(state.tokens);
            tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limited, waiting for token");
            tokio::time::sleep(wait).await;
        }
    }

    /// Take a token only if one is available right now.
    ///
    /// Returns `false` if the bucket is empty or another caller is queued.
    pub fn try_acquire(&self) -> bool {
        let Ok(mut state) = self.state.try_lock() else {
            return false;
        };
        self.refill(&mut state);
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Time until the bucket holds a whole token, never less than the 1ms
    /// timer resolution. Refill rounding can leave `tokens` a hair under 1.0,
    /// and a zero-length sleep would then spin without letting time advance.
    fn deficit_wait(&self, tokens: f64) -> Duration {
        let deficit = (1.0 - tokens).max(0.0);
        Duration::from_secs_f64(deficit / self.config.refill_rate).max(MIN_WAIT)
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.config.refill_rate).min(self.config.capacity);
        state.last_refill = now;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[test]
    fn try_acquire_drains_burst_then_refuses() {
        let rl = RateLimiter::new(RateLimiterConfig {
            capacity: 3.0,
            refill_rate: 0.0001,
        });
        let granted = (0..5).filter(|_| rl.try_acquire()).count();
        assert_eq!(granted, 3);
    }

    #[test]
    fn deficit_wait_has_timer_floor() {
        let rl = RateLimiter::new(RateLimiterConfig::per_interval(7, Duration::from_secs(1)));
        assert_eq!(rl.deficit_wait(1.0 - 1e-15), MIN_WAIT);
        let empty = rl.deficit_wait(0.0);
        assert!(empty >= Duration::from_millis(142) && empty <= Duration::from_millis(143));
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_completes_at_uneven_refill_rates() {
        for rate in [3, 5, 7, 10] {
            let rl = RateLimiter::new(RateLimiterConfig::per_interval(rate, Duration::from_secs(1)));
            let drained = tokio::time::timeout(Duration::from_secs(10_000), async {
                for _ in 0..200 {
                    rl.acquire().await;
                }
            })
            .await;
            assert!(drained.is_ok(), "acquire stalled at {rate} tokens/sec");
        }
    }

    #[test]
    fn per_interval_default() {
        let cfg = RateLimiterConfig::default();
        assert_eq!(cfg.capacity, 5.0);
        assert_eq!(cfg.refill_rate, 5.0);
        let cfg = RateLimiterConfig::per_interval(10, Duration::from_millis(500));
        assert_eq!(cfg.refill_rate, 20.0);
    }

    #[test]
    fn validate_rejects_stalled_bucket() {
        assert!(RateLimiterConfig::default().validate().is_ok());
        let stalled = RateLimiterConfig {
            capacity: 5.0,
            refill_rate: 0.0,
        };
        assert!(stalled.validate().is_err());
        let tiny = RateLimiterConfig {
            capacity: 0.5,
            refill_rate: 1.0,
        };
        assert!(tiny.validate().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_waits_for_refill() {
        let rl = RateLimiter::new(RateLimiterConfig {
            capacity: 2.0,
            refill_rate: 2.0,
        });
        let start = Instant::now();
        rl.acquire().await;
        rl.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(1));
        rl.acquire().await;
        let waited = start.elapsed();
        assert!(
            waited >= Duration::from_millis(499) && waited <= Duration::from_millis(520),
            "third token after {waited:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn grants_tokens_in_arrival_order() {
        let rl = Arc::new(RateLimiter::new(RateLimiterConfig {
            capacity: 1.0,
            refill_rate: 10.0,
        }));
        let grants = Arc::new(StdMutex::new(Vec::new()));
        let start = Instant::now();

        let callers = ["A", "B", "C", "D", "E"].map(|label| {
            let rl = rl.clone();
            let grants = grants.clone();
            async move {
                rl.acquire().await;
                grants.lock().unwrap().push((label, start.elapsed()));
            }
        });
        futures::future::join_all(callers).await;

        let grants = grants.lock().unwrap();
        let order: Vec<_> = grants.iter().map(|(label, _)| *label).collect();
        assert_eq!(order, ["A", "B", "C", "D", "E"]);
        for pair in grants.windows(2) {
            let gap = pair[1].1 - pair[0].1;
            assert!(gap >= Duration::from_millis(99), "grants too close: {gap:?}");
        }
    }
}

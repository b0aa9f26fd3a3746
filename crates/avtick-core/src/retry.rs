//! Retry policy applied per URL by the fetch client.

use std::time::Duration;

use crate::error::ApiError;

/// Delay strategy between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`, optionally jittered ±50%.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Backoff {
    /// Delay before the retry following the given 0-based attempt.
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32);
                let seconds = (base.as_secs_f64() * scale).min(max.as_secs_f64());
                let mut delay = Duration::from_secs_f64(seconds);

                if jitter {
                    let half = (delay.as_millis() as f64 * 0.5) as u64;
                    let offset = fastrand::u64(0..=half * 2) as i64 - half as i64;
                    let total = delay.as_millis() as i64 + offset;
                    delay = Duration::from_millis(total.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Bounded, classified retry policy.
///
/// The tool this replaces retried every failure forever with a fixed
/// two-second sleep; that mode survives as [`RetryPolicy::legacy`], but the
/// default bounds attempts and skips errors that cannot succeed on retry.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum total attempts per URL; `None` retries until success.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            backoff: Backoff::Exponential {
                base: Duration::from_secs(2),
                factor: 2.0,
                max: Duration::from_secs(60),
                jitter: true,
            },
        }
    }
}

impl RetryPolicy {
    /// Unbounded fixed two-second retry, matching the historical behavior of
    /// waiting out the free-tier rate limit however long it takes.
    pub fn legacy() -> Self {
        Self {
            max_attempts: None,
            backoff: Backoff::Fixed {
                delay: Duration::from_secs(2),
            },
        }
    }

    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            ..Self::default()
        }
    }

    /// Whether the error is worth another attempt at all.
    pub fn should_retry(&self, error: &ApiError) -> bool {
        error.retryable()
    }

    /// Whether another attempt is allowed after `attempts_made` attempts.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        match self.max_attempts {
            None => true,
            Some(max) => attempts_made < max,
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

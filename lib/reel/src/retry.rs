//! Retry policy for timed out calls.
//!
//! Only the timeout family of [`ApiError`] is retried. Each retry waits
//! `base_delay * 2^(attempt - 1)` before being sent, so with the default one
//! second base the waits are 1s, 2s, 4s and so on.

use std::time::Duration;

use crate::ApiError;

/// Retries allowed when none are specified.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Exponential backoff retry policy.
///
/// # Example
///
/// ```ignore
/// use reel::RetryPolicy;
///
/// let policy = RetryPolicy::new(3);
/// let movies: MovieList = pipeline.send_with_policy(&route, &policy, None).await?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy allowing `max_retries` retries after the first attempt.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Change the delay before the first retry.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Maximum number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of attempts, first one included.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns `true` if the error should be retried.
    #[must_use]
    pub const fn should_retry(&self, error: &ApiError) -> bool {
        error.is_timeout()
    }

    /// Delay to wait before the given attempt (0 is the first attempt).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        match attempt {
            0 => Duration::ZERO,
            n => {
                let factor = 1_u32.checked_shl(n - 1).unwrap_or(u32::MAX);
                self.base_delay.saturating_mul(factor)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

//! Retry policy with capped exponential backoff.

use std::time::Duration;

/// How many times a request is attempted and how long to wait in between.
///
/// The wait after attempt `n` is `base_delay * 2^(n - 1)`, capped at `max_delay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, the first one included.
    ///
    /// Default: 3
    pub max_attempts: u32,

    /// Wait after the first failed attempt.
    ///
    /// Default: 2 seconds
    pub base_delay: Duration,

    /// Upper bound for any computed wait.
    ///
    /// Default: 60 seconds
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay: defaults::BASE_DELAY,
            max_delay: defaults::MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a retry policy
    pub const fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Policy for the token endpoint: 3 attempts, 1 second base, 10 seconds cap
    pub const fn token_exchange() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(10))
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait before the attempt following `attempt` (1-based)
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);

        self.base_delay
            .checked_mul(1 << exponent)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

mod defaults {
    use std::time::Duration;

    pub const MAX_ATTEMPTS: u32 = 3;

    pub const BASE_DELAY: Duration = Duration::from_secs(2);

    pub const MAX_DELAY: Duration = Duration::from_secs(60);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Duration::from_secs(60));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::default();

        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_capped() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(6), Duration::from_secs(60));
        assert_eq!(policy.backoff(40), Duration::from_secs(60));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let policy = RetryPolicy::new(1, Duration::from_secs(2), Duration::from_secs(60));

        assert!(!policy.should_retry(1));
    }
}

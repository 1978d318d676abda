use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{is_credential_rejection, AttemptError, TransportFailure};

/// Total attempts per call, the first one included.
pub const MAX_ATTEMPTS: u32 = 3;
/// Delay before the second attempt. Doubles for every later attempt.
pub const BASE_DELAY_MS: u64 = 1000;

/// Bounded exponential backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Attempt budget, never below one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the failed attempt with zero-based index `retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.min(30);
        self.base_delay.saturating_mul(2u32.saturating_pow(exponent))
    }
}

fn retryable_status_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(
            r"(?i)rate.?limit|overloaded|service.?unavailable|resource.?exhausted|upstream.?connect|connection.?refused",
        )
        .expect("retry regex must compile")
    })
}

/// Status and error text policy for transient HTTP failures.
pub fn is_retryable_http_error(status: u16, error_text: &str) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504) || retryable_status_regex().is_match(error_text)
}

/// Whether another attempt could plausibly succeed.
pub fn is_retryable(error: &AttemptError) -> bool {
    match error {
        AttemptError::Status { status, message } => {
            !is_credential_rejection(Some(*status), message)
                && is_retryable_http_error(*status, message)
        }
        AttemptError::Transport { kind, .. } => !matches!(kind, TransportFailure::Builder),
        AttemptError::EmptyText | AttemptError::Malformed(_) => true,
        AttemptError::Blocked(_) => false,
    }
}

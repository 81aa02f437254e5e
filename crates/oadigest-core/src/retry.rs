//! Retry with exponential backoff for page requests

use std::time::Duration;

use crate::error::ClientError;

/// Exponential backoff: `base * 2^attempt` (2s, 4s, 8s, ... for a 1s base)
pub fn backoff_duration(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Retry a fallible request with exponential backoff.
///
/// Retryable errors (see [`ClientError::is_retryable`]) are logged and retried
/// up to `max_retries` times. Returns the first success, or the final error on
/// exhaustion / non-retryable failure.
pub fn retry_with_backoff<T>(
    label: &str,
    max_retries: u32,
    base_delay: Duration,
    mut attempt_fn: impl FnMut() -> Result<T, ClientError>,
) -> Result<T, ClientError> {
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                attempt += 1;
                let delay = backoff_duration(base_delay, attempt);
                log::warn!("{label}: {e}, retry {attempt}/{max_retries} in {delay:?}");
                std::thread::sleep(delay);
            }
            Err(e) => {
                if attempt > 0 {
                    log::error!("{label}: failed after {attempt} retries: {e}");
                }
                return Err(e);
            }
        }
    }
}

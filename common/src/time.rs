//! Time utilities for CoinConv.
//!
//! Rates and cache records carry whole epoch seconds, which is what the
//! wire format and the cache store expose.

use chrono::Utc;

/// Unix timestamp in whole seconds.
pub type EpochSeconds = i64;

/// Get the current timestamp.
pub fn now() -> EpochSeconds {
    Utc::now().timestamp()
}

/// Seconds elapsed since `timestamp`. Negative when the timestamp is in the future.
pub fn age_of(timestamp: EpochSeconds) -> i64 {
    now().saturating_sub(timestamp)
}

/// Check whether `timestamp` is no older than `max_age_seconds`.
pub fn is_within(timestamp: EpochSeconds, max_age_seconds: u64) -> bool {
    let max_age = i64::try_from(max_age_seconds).unwrap_or(i64::MAX);
    age_of(timestamp) <= max_age
}

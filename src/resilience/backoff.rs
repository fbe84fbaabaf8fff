//! Pure exponential backoff.

use std::time::Duration;

/// Delay before the retry that follows failed attempt `attempt` (1-based).
///
/// The first retry waits `base_ms`, the second `2 * base_ms`, doubling
/// until `max_ms`. No jitter is applied, so the schedule is exact: a
/// call with a 1000 ms base retries after 1000 ms, then 2000 ms, ...
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    Duration::from_millis(delay_ms.min(max_ms))
}

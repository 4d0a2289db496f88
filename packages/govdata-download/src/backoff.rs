use std::time::Duration;

use rand::Rng;

const BASE_MILLIS: u64 = 1_000;
const CAP_MILLIS: u64 = 60_000;

/// Exponential backoff with bounded jitter: base one second, doubling,
/// capped at sixty seconds. `attempt` is 1-based (the
/// delay awaited *before* retrying after attempt `attempt` fails).
pub fn delay_for_attempt(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(6); // 2^6 * 1000ms already exceeds the cap
    let doubled = BASE_MILLIS.saturating_mul(1u64 << exponent);
    let capped = doubled.min(CAP_MILLIS);
    let jitter_bound = (capped / 4).max(1);
    let jitter = rand::thread_rng().gen_range(0..=jitter_bound);
    Duration::from_millis(capped + jitter)
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BASE_DELAY_MS: u64 = 250;
const MAX_DELAY_MS: u64 = 5_000;

/// Bounded retry with exponential backoff for anti-bot blocks. The original
/// behavior here was an unbounded retry on every 403; the cap turns a
/// permanently-blocking upstream into a `RetryExhausted` error instead of a
/// spin.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based): base doubled
    /// per attempt, capped, with jitter on top.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(6);
        let backoff = self
            .base_delay_ms
            .saturating_mul(1u64 << doublings)
            .min(MAX_DELAY_MS);
        Duration::from_millis(backoff + jitter_ms(backoff / 2 + 1))
    }
}

/// Random-ish jitter in milliseconds within [0, range).
pub(crate) fn jitter_ms(range: u64) -> u64 {
    if range == 0 {
        return 0;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_nanos(0));
    let nanos = now.subsec_nanos() as u64;
    let micros = (now.as_micros() & 0xFFFF) as u64;
    (nanos ^ (micros << 5)) % range
}

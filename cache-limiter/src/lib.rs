#![warn(missing_docs)]
//! Token-bucket rate limiter gating cache writes.
//!
//! A single process-wide bucket, refilled at a configured rate of
//! `r` tokens/second. One token is consumed per `Put` attempt, including
//! attempts that later fail validation or the backend write itself. If
//! insufficient tokens are available the attempt is denied immediately —
//! there is no queueing and no blocking. `Get` is never rate-limited; this
//! module only ever sees `Put` attempts.
//!
//! Concurrent access is lock-free: tokens are tracked as a fixed-point
//! (microtoken) count in an [`AtomicI64`], refilled lazily on each
//! [`RateLimiter::try_acquire`] call by whichever caller observes the
//! elapsed time first. Under extreme contention, multiple callers can race
//! the refill compare-and-swap; the bucket then tolerates up to one token
//! of error, which is an accepted, explicit tradeoff for lock freedom.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use tokio::time::Instant;

/// Fixed-point scale: one token is `MICRO` microtokens. Using an integer
/// atomic instead of an atomic float keeps the hot path lock-free without
/// relying on floating-point CAS tricks.
const MICRO: f64 = 1_000_000.0;

/// Process-wide token-bucket rate limiter.
///
/// Disabled limiters (`rate_limiter.enabled = false` in configuration)
/// always allow — see [`RateLimiter::disabled`].
pub struct RateLimiter {
    enabled: bool,
    rate_per_second: f64,
    capacity_micro: i64,
    tokens_micro: AtomicI64,
    last_refill_nanos: AtomicU64,
    start: Instant,
}

impl RateLimiter {
    /// Create a limiter refilling at `rate_per_second` tokens/second, with a
    /// burst capacity of one second's worth of tokens (the bucket starts
    /// full).
    pub fn new(rate_per_second: f64) -> Self {
        let capacity_micro = (rate_per_second * MICRO).round() as i64;
        Self {
            enabled: true,
            rate_per_second,
            capacity_micro,
            tokens_micro: AtomicI64::new(capacity_micro),
            last_refill_nanos: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    /// Create a limiter that always allows every attempt — used when
    /// `rate_limiter.enabled = false`.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            rate_per_second: 0.0,
            capacity_micro: 0,
            tokens_micro: AtomicI64::new(0),
            last_refill_nanos: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    /// Configured refill rate in tokens/second.
    pub fn rate_per_second(&self) -> f64 {
        self.rate_per_second
    }

    /// Attempt to consume one token. Returns `true` if the attempt is
    /// allowed, `false` if the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        if !self.enabled {
            return true;
        }
        self.refill();
        self.tokens_micro
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current >= MICRO as i64).then_some(current - MICRO as i64)
            })
            .is_ok()
    }

    fn refill(&self) {
        let now_nanos = self.start.elapsed().as_nanos() as u64;
        let last = self.last_refill_nanos.load(Ordering::Acquire);
        if now_nanos <= last {
            return;
        }
        // Only the caller that wins this CAS performs the refill; losers
        // simply proceed to try_acquire's token CAS with whatever count is
        // currently there, which is the documented one-token tolerance.
        if self
            .last_refill_nanos
            .compare_exchange(last, now_nanos, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            return;
        }
        let elapsed_secs = (now_nanos - last) as f64 / 1_000_000_000.0;
        let refill_micro = (elapsed_secs * self.rate_per_second * MICRO).round() as i64;
        if refill_micro <= 0 {
            return;
        }
        let capacity = self.capacity_micro;
        self.tokens_micro
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some((current + refill_micro).min(capacity))
            })
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn disabled_always_allows() {
        let limiter = RateLimiter::disabled();
        for _ in 0..1000 {
            assert!(limiter.try_acquire());
        }
    }

    #[test]
    fn denies_once_bucket_is_empty() {
        let limiter = RateLimiter::new(1.0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn refills_over_time() {
        let limiter = RateLimiter::new(1.0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        tokio::time::advance(Duration::from_millis(1100)).await;
        assert!(limiter.try_acquire());
    }

    #[test]
    fn concurrent_attempts_never_exceed_capacity_plus_tolerance() {
        let limiter = Arc::new(RateLimiter::new(5.0));
        let mut handles = Vec::new();
        for _ in 0..50 {
            let limiter = limiter.clone();
            handles.push(std::thread::spawn(move || limiter.try_acquire()));
        }
        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();
        assert!(allowed <= 6, "allowed {allowed} exceeded capacity + tolerance");
    }
}

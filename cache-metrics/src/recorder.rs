//! Recording functions for the service's metrics.
//!
//! These call straight into the `metrics` facade crate, so they work against
//! whichever global recorder is installed (or none — the facade's default
//! recorder is a no-op, which is exactly what tests want).

use std::time::Duration;

use crate::names::{
    CONNECTIONS_CLOSED, CONNECTIONS_ERRORS, CONNECTIONS_OPENED, EXTRA_TTL_SECONDS, REQUEST_DURATION,
    REQUEST_TOTAL,
};

/// Record one request outcome and its duration.
///
/// `op` is `"put"` or `"get"`; `outcome` is one of
/// `ok|bad_request|not_found|exists|rate_limited|backend_error`.
#[inline]
pub fn record_request(op: &str, outcome: &str, duration: Duration) {
    metrics::counter!(*REQUEST_TOTAL, "op" => op.to_string(), "outcome" => outcome.to_string())
        .increment(1);
    metrics::histogram!(*REQUEST_DURATION, "op" => op.to_string())
        .record(duration.as_secs_f64());
}

/// Record that a backend connection was opened.
#[inline]
pub fn connection_opened() {
    metrics::counter!(*CONNECTIONS_OPENED).increment(1);
}

/// Record that a backend connection was closed.
#[inline]
pub fn connection_closed() {
    metrics::counter!(*CONNECTIONS_CLOSED).increment(1);
}

/// Record a backend connection error.
#[inline]
pub fn connection_error() {
    metrics::counter!(*CONNECTIONS_ERRORS).increment(1);
}

/// Publish the configured extra-TTL-seconds value as a gauge. Reported only,
/// never read back by the service itself.
#[inline]
pub fn set_extra_ttl_seconds(seconds: u64) {
    metrics::gauge!(*EXTRA_TTL_SECONDS).set(seconds as f64);
}

//! Metric name registration.
//!
//! All names are registered once via `lazy_static`, the way `hitbox-backend`
//! registers its `hitbox_backend_*` metrics, so `describe_*!` runs exactly
//! once regardless of how many times a handler records a sample.

lazy_static::lazy_static! {
    /// `request_total{op,outcome}` — request outcome counter.
    pub static ref REQUEST_TOTAL: &'static str = {
        metrics::describe_counter!(
            "request_total",
            "Total requests handled, labeled by operation and outcome."
        );
        "request_total"
    };

    /// `request_duration_seconds{op}` — request latency histogram.
    pub static ref REQUEST_DURATION: &'static str = {
        metrics::describe_histogram!(
            "request_duration_seconds",
            metrics::Unit::Seconds,
            "Request handling duration in seconds, labeled by operation."
        );
        "request_duration_seconds"
    };

    /// `connections_opened` — cumulative backend connections opened.
    pub static ref CONNECTIONS_OPENED: &'static str = {
        metrics::describe_counter!(
            "connections_opened",
            "Total backend connections opened."
        );
        "connections_opened"
    };

    /// `connections_closed` — cumulative backend connections closed.
    pub static ref CONNECTIONS_CLOSED: &'static str = {
        metrics::describe_counter!(
            "connections_closed",
            "Total backend connections closed."
        );
        "connections_closed"
    };

    /// `connections_errors` — cumulative backend connection errors.
    pub static ref CONNECTIONS_ERRORS: &'static str = {
        metrics::describe_counter!(
            "connections_errors",
            "Total backend connection errors."
        );
        "connections_errors"
    };

    /// `extra_ttl_seconds` — the configured extra-TTL gauge, reported only.
    pub static ref EXTRA_TTL_SECONDS: &'static str = {
        metrics::describe_gauge!(
            "extra_ttl_seconds",
            metrics::Unit::Seconds,
            "Configured extra TTL seconds applied at the backend boundary, reported only."
        );
        "extra_ttl_seconds"
    };
}

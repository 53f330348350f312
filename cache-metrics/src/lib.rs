#![warn(missing_docs)]
//! Metrics facade for the auction cache.
//!
//! A small, closed set of counters/histograms/gauges, recorded through the
//! `metrics` facade crate so the concrete sink (Prometheus scrape endpoint,
//! statsd push, or nothing at all in tests) is swappable without touching
//! call sites.

mod names;
mod recorder;
mod sink;

pub use recorder::{
    connection_closed, connection_error, connection_opened, record_request, set_extra_ttl_seconds,
};
pub use sink::{install, MetricsError, ScrapeHandle, SinkKind};

//! Sink installation. Two sink kinds are supported: an export-scrape
//! endpoint (Prometheus-style) and a push sink (statsd-style), selected by
//! `metrics.type` in configuration.

use thiserror::Error;

/// Failure installing a metrics sink. Fatal at bootstrap.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The requested sink type isn't compiled in (its cargo feature is off).
    #[error("metrics sink {0:?} not compiled in")]
    SinkNotAvailable(SinkKind),
    /// The Prometheus recorder could not be installed (e.g. installed
    /// twice in the same process).
    #[error("failed to install prometheus recorder: {0}")]
    Prometheus(String),
    /// The statsd recorder could not be installed (bad host/port, socket
    /// error).
    #[error("failed to install statsd recorder: {0}")]
    Statsd(String),
}

/// Which sink kind configuration selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// No metrics sink — recording calls are no-ops. Used in tests.
    None,
    /// Prometheus-style scrape endpoint.
    Prometheus,
    /// statsd-style push sink.
    Statsd,
}

/// Handle returned when a scrape-style sink is installed, letting the
/// caller (the admin HTTP server) render the current snapshot on demand.
pub enum ScrapeHandle {
    /// No scrape body to render; the admin endpoint should return an empty
    /// body (or 404, at the caller's discretion).
    None,
    /// Prometheus text-exposition-format snapshot renderer.
    #[cfg(feature = "prometheus")]
    Prometheus(metrics_exporter_prometheus::PrometheusHandle),
}

impl ScrapeHandle {
    /// Render the current metrics snapshot, or an empty string if this
    /// sink has nothing to scrape (push sinks, or no sink).
    pub fn render(&self) -> String {
        match self {
            ScrapeHandle::None => String::new(),
            #[cfg(feature = "prometheus")]
            ScrapeHandle::Prometheus(handle) => handle.render(),
        }
    }
}

/// Install `kind` as the process-wide global metrics recorder.
///
/// Returns a [`ScrapeHandle`] for sinks that support scraping. Installing a
/// sink is a one-time, fatal-on-failure bootstrap step — call it once
/// before any request is served.
pub fn install(
    kind: SinkKind,
    statsd_host: &str,
    statsd_port: u16,
    statsd_prefix: &str,
) -> Result<ScrapeHandle, MetricsError> {
    match kind {
        SinkKind::None => Ok(ScrapeHandle::None),
        SinkKind::Prometheus => {
            #[cfg(feature = "prometheus")]
            {
                let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
                    .install_recorder()
                    .map_err(|e| MetricsError::Prometheus(e.to_string()))?;
                Ok(ScrapeHandle::Prometheus(handle))
            }
            #[cfg(not(feature = "prometheus"))]
            {
                Err(MetricsError::SinkNotAvailable(SinkKind::Prometheus))
            }
        }
        SinkKind::Statsd => {
            #[cfg(feature = "statsd")]
            {
                let recorder = metrics_exporter_statsd::StatsdBuilder::from(
                    statsd_host.to_string(),
                    statsd_port,
                )
                .with_queue_size(5000)
                .build(Some(statsd_prefix))
                .map_err(|e| MetricsError::Statsd(e.to_string()))?;
                metrics::set_global_recorder(recorder)
                    .map_err(|e| MetricsError::Statsd(e.to_string()))?;
                Ok(ScrapeHandle::None)
            }
            #[cfg(not(feature = "statsd"))]
            {
                let _ = (statsd_host, statsd_port, statsd_prefix);
                Err(MetricsError::SinkNotAvailable(SinkKind::Statsd))
            }
        }
    }
}

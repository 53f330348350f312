//! Fatal configuration and bootstrap errors.

/// Error loading configuration or turning it into live runtime objects.
///
/// Every variant here is fatal: encountering one means the process exits
/// before serving any traffic.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file's YAML didn't parse, or didn't match the expected
    /// shape.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A backend driver could not be constructed from its configuration
    /// (bad connection string, missing required field).
    #[error("backend {backend:?} unavailable: {reason}")]
    BackendUnavailable {
        /// Which `backend.type` failed to build.
        backend: String,
        /// Why.
        reason: String,
    },

    /// The metrics sink named in `metrics.type` could not be installed.
    #[error("metrics sink unavailable: {0}")]
    MetricsUnavailable(#[from] cache_metrics::MetricsError),

    /// A required secret (e.g. `api_key` when `allow_keys` is set) wasn't
    /// supplied either in the config file or its environment override.
    #[error("missing required secret: {0}")]
    MissingSecret(String),
}

//! Top-level configuration shape, loaded from a YAML file.

use serde::Deserialize;

use crate::backend::Backend;
use crate::error::ConfigError;

fn default_port() -> u16 {
    2424
}

fn default_admin_port() -> u16 {
    2525
}

fn default_max_num_values() -> usize {
    10
}

fn default_max_size_bytes() -> usize {
    10_240
}

/// `server.*` options.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Port the cache HTTP API binds to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Port the metrics/status admin API binds to.
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,
    /// Per-request read timeout.
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
    /// Per-request write timeout.
    #[serde(default)]
    pub write_timeout_ms: Option<u64>,
    /// Maximum elements in a single `POST /cache` batch.
    #[serde(default = "default_max_num_values")]
    pub max_num_values: usize,
    /// Maximum serialized payload size, in bytes, for a single element.
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: usize,
    /// Whether callers may supply their own key (gated by `api_key`).
    #[serde(default)]
    pub allow_keys: bool,
    /// Shared secret required to use a caller-chosen key when `allow_keys`
    /// is set. May also be supplied via the `CACHE_API_KEY` environment
    /// variable, which takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            admin_port: default_admin_port(),
            read_timeout_ms: None,
            write_timeout_ms: None,
            max_num_values: default_max_num_values(),
            max_size_bytes: default_max_size_bytes(),
            allow_keys: false,
            api_key: None,
        }
    }
}

/// `ttl.*`, spelled `request.*` in configuration to match the field names
/// callers already know from the write request body.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TtlSettings {
    /// Hard ceiling on `ttlseconds`; `0` means unbounded.
    #[serde(default)]
    pub max_ttl_seconds: u64,
    /// Reported-only extra TTL gauge (no enforcement effect).
    #[serde(default)]
    pub extra_ttl_seconds: u64,
}

/// `rate_limiter.*` options.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimiterSettings {
    /// Whether the limiter gates writes at all.
    #[serde(default)]
    pub enabled: bool,
    /// Tokens refilled per second.
    #[serde(default)]
    pub num_requests: f64,
}

impl Default for RateLimiterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            num_requests: 0.0,
        }
    }
}

/// Which metrics sink to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSinkType {
    /// Recording calls are no-ops.
    None,
    /// Export-scrape endpoint served on the admin port.
    Prometheus,
    /// Push sink (statsd-style).
    Statsd,
}

impl Default for MetricsSinkType {
    fn default() -> Self {
        MetricsSinkType::None
    }
}

/// `metrics.*` options.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// Which sink to install.
    #[serde(rename = "type", default)]
    pub kind: MetricsSinkType,
    /// Push-sink destination host (statsd only).
    #[serde(default)]
    pub host: String,
    /// Push-sink destination port (statsd only).
    #[serde(default)]
    pub port: u16,
    /// Metric name prefix (statsd only).
    #[serde(default)]
    pub prefix: String,
    /// Path the scrape endpoint is served on (Prometheus only).
    #[serde(default = "default_scrape_path")]
    pub scrape_path: String,
}

fn default_scrape_path() -> String {
    "/metrics".to_string()
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            kind: MetricsSinkType::default(),
            host: String::new(),
            port: 0,
            prefix: String::new(),
            scrape_path: default_scrape_path(),
        }
    }
}

/// `logging.*` options.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber` env-filter directive, e.g. `"info"` or
    /// `"cache_server=debug,info"`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `"text"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// The complete configuration tree, deserialized from one YAML document.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// `server.*`
    #[serde(default)]
    pub server: ServerSettings,
    /// `ttl.*`
    #[serde(default)]
    pub ttl: TtlSettings,
    /// `rate_limiter.*`
    #[serde(default)]
    pub rate_limiter: RateLimiterSettings,
    /// `backend.*`
    pub backend: Backend,
    /// `metrics.*`
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// `logging.*`
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parse `yaml` into a [`Settings`] tree.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Read and parse the YAML file at `path`, then apply environment
    /// variable overrides for secrets.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut settings = Self::from_yaml_str(&text)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Environment variables win over the file for anything secret-shaped.
    /// Currently just `CACHE_API_KEY`.
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("CACHE_API_KEY") {
            self.server.api_key = Some(api_key);
        }
    }
}

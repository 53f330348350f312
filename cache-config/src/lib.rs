#![warn(missing_docs)]
//! Configuration loading and runtime construction for the cache service.
//!
//! [`Settings`] deserializes the service's YAML configuration file with
//! [`serde_saphyr`]; [`Settings::into_runtime`] builds the live, connected
//! backend (driver wrapped in the rate-limiter and metrics decorators) and
//! installs the configured metrics sink.

mod backend;
mod error;
mod runtime;
mod settings;

pub use backend::{
    AerospikeSettings, Backend, CassandraSettings, CompositeSettings, IgniteSettings,
    MemcacheSettings, MemorySettings, RedisSettings,
};
pub use error::ConfigError;
pub use runtime::Runtime;
pub use settings::{
    LoggingSettings, MetricsSettings, MetricsSinkType, RateLimiterSettings, ServerSettings,
    Settings, TtlSettings,
};

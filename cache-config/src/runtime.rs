//! Turns parsed [`Settings`] into the live objects `cache-server` serves
//! requests with.

use std::sync::Arc;

use cache_backend::{Backend, MetricsBackend, RateLimitedBackend};
use cache_limiter::RateLimiter;
use cache_metrics::ScrapeHandle;

use crate::error::ConfigError;
use crate::settings::{MetricsSinkType, Settings};

/// Everything a running server needs, constructed once at bootstrap and
/// shared across all request handlers.
pub struct Runtime {
    /// The fully decorated backend: metrics (outermost) wrapping the rate
    /// limiter wrapping the configured driver.
    pub backend: Arc<dyn Backend>,
    /// Scrape handle for the admin metrics endpoint, if a scrape-style sink
    /// was installed.
    pub scrape_handle: ScrapeHandle,
    /// Snapshot of the settings handlers consult directly (validation
    /// limits, TTL caps, the write-authorization secret).
    pub settings: Settings,
}

impl Settings {
    /// Build the backend stack and install the metrics sink this
    /// configuration describes.
    ///
    /// This is a fatal, one-time bootstrap step: any error here should end
    /// the process before it binds a socket.
    pub async fn into_runtime(self) -> Result<Runtime, ConfigError> {
        if self.server.allow_keys && self.server.api_key.is_none() {
            return Err(ConfigError::MissingSecret(
                "server.allow_keys is set but no api_key was supplied (config file \
                 or CACHE_API_KEY)"
                    .to_string(),
            ));
        }

        let scrape_handle = install_metrics(&self)?;

        let driver = self.backend.clone().into_backend().await?;
        let limiter = if self.rate_limiter.enabled {
            Arc::new(RateLimiter::new(self.rate_limiter.num_requests))
        } else {
            Arc::new(RateLimiter::disabled())
        };
        let rate_limited = RateLimitedBackend::new(driver, limiter);
        let backend: Arc<dyn Backend> = Arc::new(MetricsBackend::new(rate_limited));

        cache_metrics::set_extra_ttl_seconds(self.ttl.extra_ttl_seconds);

        Ok(Runtime {
            backend,
            scrape_handle,
            settings: self,
        })
    }
}

fn install_metrics(settings: &Settings) -> Result<ScrapeHandle, ConfigError> {
    let kind = match settings.metrics.kind {
        MetricsSinkType::None => cache_metrics::SinkKind::None,
        MetricsSinkType::Prometheus => cache_metrics::SinkKind::Prometheus,
        MetricsSinkType::Statsd => cache_metrics::SinkKind::Statsd,
    };
    let handle = cache_metrics::install(
        kind,
        &settings.metrics.host,
        settings.metrics.port,
        &settings.metrics.prefix,
    )?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend as BackendConfig, MemorySettings};
    use crate::settings::{RateLimiterSettings, ServerSettings, TtlSettings};

    fn memory_settings() -> Settings {
        Settings {
            server: ServerSettings::default(),
            ttl: TtlSettings::default(),
            rate_limiter: RateLimiterSettings::default(),
            backend: BackendConfig::Memory(MemorySettings {
                max_entries: std::num::NonZeroUsize::new(16).unwrap(),
            }),
            metrics: Default::default(),
            logging: Default::default(),
        }
    }

    #[tokio::test]
    async fn allow_keys_without_api_key_is_rejected() {
        let mut settings = memory_settings();
        settings.server.allow_keys = true;
        settings.server.api_key = None;
        let err = settings.into_runtime().await.unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(_)));
    }

    #[tokio::test]
    async fn allow_keys_with_api_key_boots_fine() {
        let mut settings = memory_settings();
        settings.server.allow_keys = true;
        settings.server.api_key = Some("s3cret".to_string());
        assert!(settings.into_runtime().await.is_ok());
    }
}

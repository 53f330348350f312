//! Shared application state injected into every handler.

use std::sync::Arc;

use cache_backend::Backend;
use cache_config::{Runtime, ServerSettings, TtlSettings};
use cache_core::IdentifierGenerator;

/// State backing the `POST /cache` and `GET /cache` handlers.
#[derive(Clone)]
pub struct CacheState {
    /// The fully decorated backend (metrics, then rate limiting, then the
    /// configured driver).
    pub backend: Arc<dyn Backend>,
    /// Validation limits and the write-authorization secret.
    pub server: ServerSettings,
    /// TTL caps.
    pub ttl: TtlSettings,
    /// Generates server-assigned identifiers for elements without a
    /// caller-chosen key.
    pub ids: IdentifierGenerator,
}

/// State backing the admin port (`/status`, `/version`, metrics scrape).
#[derive(Clone)]
pub struct AdminState {
    /// Backend used for the `/status` health probe.
    pub backend: Arc<dyn Backend>,
    /// Renders the current metrics snapshot, or an empty body for push
    /// sinks and the no-op sink.
    pub scrape_handle: Arc<cache_metrics::ScrapeHandle>,
    /// Path the metrics scrape endpoint is served on.
    pub scrape_path: String,
}

impl CacheState {
    /// Build handler state from a constructed [`Runtime`].
    pub fn from_runtime(runtime: &Runtime) -> Self {
        Self {
            backend: runtime.backend.clone(),
            server: runtime.settings.server.clone(),
            ttl: runtime.settings.ttl,
            ids: IdentifierGenerator::new(),
        }
    }
}

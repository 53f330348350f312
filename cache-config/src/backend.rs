//! The `backend.*` configuration tree: one tagged variant per driver, plus
//! `into_backend` to turn configuration into a live, connected
//! [`cache_backend::Backend`].

use std::future::Future;
use std::num::NonZeroUsize;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use cache_backend::Backend as BackendTrait;

use crate::error::ConfigError;

/// `backend.type: memory`
#[derive(Debug, Clone, Deserialize)]
pub struct MemorySettings {
    /// Maximum number of entries retained before LRU eviction kicks in.
    pub max_entries: NonZeroUsize,
}

/// `backend.type: redis`
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// `redis://` connection URL.
    pub connection_string: String,
    /// Optional label for metrics/composite logs.
    #[serde(default)]
    pub label: Option<String>,
}

/// `backend.type: memcache`
#[derive(Debug, Clone, Deserialize)]
pub struct MemcacheSettings {
    /// `host:port` of the Memcached server.
    pub addr: String,
    /// Optional label for metrics/composite logs.
    #[serde(default)]
    pub label: Option<String>,
}

/// `backend.type: aerospike`
#[derive(Debug, Clone, Deserialize)]
pub struct AerospikeSettings {
    /// Seed node list, `host1:port1,host2:port2` syntax.
    pub hosts: String,
    /// Aerospike namespace to store records in.
    pub namespace: String,
    /// Aerospike set to store records in.
    pub set: String,
    /// Optional label for metrics/composite logs.
    #[serde(default)]
    pub label: Option<String>,
}

/// `backend.type: cassandra`
#[derive(Debug, Clone, Deserialize)]
pub struct CassandraSettings {
    /// Contact points for the driver's control connection.
    pub known_nodes: Vec<String>,
    /// Keyspace records are stored in.
    pub keyspace: String,
    /// Table records are stored in.
    pub table: String,
    /// Optional label for metrics/composite logs.
    #[serde(default)]
    pub label: Option<String>,
}

/// `backend.type: ignite`
#[derive(Debug, Clone, Deserialize)]
pub struct IgniteSettings {
    /// Base URL of the REST API, e.g. `https://ignite.internal:8080`.
    pub base_url: String,
    /// Cache name records are stored under.
    pub cache_name: String,
    /// Accept invalid TLS certificates. Only for trusted internal clusters.
    #[serde(default)]
    pub insecure_tls: bool,
    /// Issue `cmd=getorcreate` at startup so the cache exists before traffic
    /// arrives.
    #[serde(default)]
    pub create_on_start: bool,
    /// Optional label for metrics/composite logs.
    #[serde(default)]
    pub label: Option<String>,
}

/// `backend.type: composite`
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeSettings {
    /// Fast, authoritative tier.
    pub primary: Box<Backend>,
    /// Fallback tier, consulted on a primary miss.
    pub secondary: Box<Backend>,
}

/// Tagged union of every supported backend driver's configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Backend {
    /// In-process LRU map.
    Memory(MemorySettings),
    /// Redis.
    Redis(RedisSettings),
    /// Memcached.
    Memcache(MemcacheSettings),
    /// Aerospike.
    Aerospike(AerospikeSettings),
    /// Cassandra.
    Cassandra(CassandraSettings),
    /// Apache Ignite, over its REST API.
    Ignite(IgniteSettings),
    /// Two-tier composite of two other backends.
    Composite(CompositeSettings),
}

type BuildFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn BackendTrait>, ConfigError>> + Send>>;

impl Backend {
    /// Build the live, connected backend this configuration describes.
    ///
    /// Boxed because [`Backend::Composite`] recurses into this same method
    /// for both tiers, which an `async fn` can't do without indirection.
    pub fn into_backend(self) -> BuildFuture {
        Box::pin(async move {
            match self {
                Backend::Memory(settings) => {
                    let backend = cache_backend_memory::MemoryBackend::new(settings.max_entries);
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
                Backend::Redis(settings) => {
                    let mut backend = cache_backend_redis::RedisBackend::new(
                        settings.connection_string,
                    )
                    .map_err(|err| ConfigError::BackendUnavailable {
                        backend: "redis".to_string(),
                        reason: err.to_string(),
                    })?;
                    if let Some(label) = settings.label {
                        backend = backend.with_label(label);
                    }
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
                Backend::Memcache(settings) => {
                    let mut backend = cache_backend_memcache::MemcacheBackend::new(settings.addr);
                    if let Some(label) = settings.label {
                        backend = backend.with_label(label);
                    }
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
                Backend::Aerospike(settings) => {
                    let mut backend = cache_backend_aerospike::AerospikeBackend::new(
                        settings.hosts,
                        settings.namespace,
                        settings.set,
                    )
                    .map_err(|err| ConfigError::BackendUnavailable {
                        backend: "aerospike".to_string(),
                        reason: err.to_string(),
                    })?;
                    if let Some(label) = settings.label {
                        backend = backend.with_label(label);
                    }
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
                Backend::Cassandra(settings) => {
                    let mut backend = cache_backend_cassandra::CassandraBackend::new(
                        &settings.known_nodes,
                        settings.keyspace,
                        settings.table,
                    )
                    .await
                    .map_err(|err| ConfigError::BackendUnavailable {
                        backend: "cassandra".to_string(),
                        reason: err.to_string(),
                    })?;
                    if let Some(label) = settings.label {
                        backend = backend.with_label(label);
                    }
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
                Backend::Ignite(settings) => {
                    let mut backend = cache_backend_ignite::IgniteBackend::new(
                        settings.base_url,
                        settings.cache_name,
                        settings.insecure_tls,
                    )
                    .map_err(|err| ConfigError::BackendUnavailable {
                        backend: "ignite".to_string(),
                        reason: err.to_string(),
                    })?;
                    if let Some(label) = settings.label {
                        backend = backend.with_label(label);
                    }
                    if settings.create_on_start {
                        backend.ensure_cache().await.map_err(|err| {
                            ConfigError::BackendUnavailable {
                                backend: "ignite".to_string(),
                                reason: err.to_string(),
                            }
                        })?;
                    }
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
                Backend::Composite(settings) => {
                    let primary = settings.primary.into_backend().await?;
                    let secondary = settings.secondary.into_backend().await?;
                    let backend = cache_backend::CompositeBackend::new(primary, secondary);
                    Ok(Arc::new(backend) as Arc<dyn BackendTrait>)
                }
            }
        })
    }
}

//! Core backend trait for cache storage implementations.
//!
//! Every supported storage technology (memory, Redis, Memcached, Aerospike,
//! Cassandra, Ignite, and the two-tier [`composite`](crate::composite)
//! backend) implements this single trait. Decorators ([`metrics`](crate::metrics_wrapper),
//! [`rate_limit`](crate::rate_limit_wrapper)) wrap any implementation and
//! implement the same trait, so they compose by plain nesting rather than
//! inheritance.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::BackendError;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Low-level storage contract. Implementors need not know about media
/// types or framing — they see only an opaque key and an opaque value.
///
/// # Put-if-absent
///
/// [`Backend::put`] MUST succeed only if `key` was not already bound, and
/// MUST return [`BackendError::RecordExists`] otherwise. This is
/// load-bearing: callers may choose their own key, and deduplication relies
/// on this contract being atomic. Drivers without a native compare-and-set
/// primitive emulate it — see each driver's module docs for how.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the opaque stored value for `key`.
    ///
    /// Returns [`BackendError::KeyNotFound`] if no binding exists — a miss
    /// is a distinguished error, not an empty success.
    async fn get(&self, key: &str) -> BackendResult<Bytes>;

    /// Write `value` under `key` with put-if-absent semantics.
    ///
    /// `ttl` of `Duration::ZERO` means "use the backend's own default
    /// expiry"; the caller is responsible for capping the TTL against the
    /// configured maximum before calling this.
    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()>;

    /// Label identifying this backend in metrics and composite logs.
    /// Default: `"backend"`.
    fn label(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        (**self).put(key, value, ttl).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

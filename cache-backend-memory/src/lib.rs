#![warn(missing_docs)]
//! In-memory cache backend.
//!
//! A mapping from key to value with an LRU eviction bound on entry count.
//! Concurrent access is serialized under a single [`std::sync::Mutex`] —
//! there is no lock-striping, since this backend targets small deployments
//! and tests, not the high-fanout path a distributed driver serves.
//!
//! TTL is approximated by a per-entry deadline checked lazily on [`Backend::get`]
//! — an expired entry is evicted and reported as `KeyNotFound` the first
//! time anyone looks at it, not proactively swept. Entries may also be
//! force-expired early by the LRU if the map grows past its configured
//! entry-count bound, even before their deadline passes.
//!
//! Put-if-absent is implemented exactly (not emulated): the single mutex
//! makes "check, then insert" atomic with respect to every other caller.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use tokio::time::Instant;

use cache_backend::{Backend, BackendError, BackendResult};

struct Entry {
    value: Bytes,
    deadline: Option<Instant>,
}

/// In-memory LRU cache backend.
pub struct MemoryBackend {
    entries: Mutex<LruCache<String, Entry>>,
    label: String,
}

impl MemoryBackend {
    /// Create a backend bounded to `max_entries` entries. Once full, the
    /// least-recently-used entry is evicted to make room for a new write.
    pub fn new(max_entries: std::num::NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(max_entries)),
            label: "memory".to_string(),
        }
    }

    /// Set a custom label for metrics/composite logs.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Current number of live entries, including ones that have passed
    /// their TTL deadline but haven't been looked up yet.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// `true` if the backend currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) => {
                if let Some(deadline) = entry.deadline {
                    if Instant::now() >= deadline {
                        entries.pop(key);
                        return Err(BackendError::KeyNotFound);
                    }
                }
                Ok(entry.value.clone())
            }
            None => Err(BackendError::KeyNotFound),
        }
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries.peek(key) {
            let expired = existing
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline);
            if !expired {
                return Err(BackendError::RecordExists);
            }
            entries.pop(key);
        }
        let deadline = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        entries.put(key.to_string(), Entry { value, deadline });
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn backend(capacity: usize) -> MemoryBackend {
        MemoryBackend::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let backend = backend(16);
        backend
            .put("k", Bytes::from_static(b"v"), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Bytes::from_static(b"v"));
    }

    #[tokio::test]
    async fn get_unknown_key_is_key_not_found() {
        let backend = backend(16);
        assert!(matches!(
            backend.get("missing").await.unwrap_err(),
            BackendError::KeyNotFound
        ));
    }

    #[tokio::test]
    async fn put_if_absent_rejects_duplicate() {
        let backend = backend(16);
        backend
            .put("k", Bytes::from_static(b"v1"), Duration::from_secs(60))
            .await
            .unwrap();
        let err = backend
            .put("k", Bytes::from_static(b"v2"), Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::RecordExists));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_lazily_evicted_and_reusable() {
        let backend = backend(16);
        backend
            .put("k", Bytes::from_static(b"v1"), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(20)).await;
        assert!(matches!(
            backend.get("k").await.unwrap_err(),
            BackendError::KeyNotFound
        ));
        // Having expired, the key can be reused by a fresh write.
        backend
            .put("k", Bytes::from_static(b"v2"), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Bytes::from_static(b"v2"));
    }

    #[tokio::test]
    async fn zero_ttl_means_no_deadline() {
        let backend = backend(16);
        backend
            .put("k", Bytes::from_static(b"v"), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Bytes::from_static(b"v"));
    }

    #[tokio::test]
    async fn lru_evicts_oldest_entry_once_full() {
        let backend = backend(2);
        backend
            .put("a", Bytes::from_static(b"1"), Duration::ZERO)
            .await
            .unwrap();
        backend
            .put("b", Bytes::from_static(b"2"), Duration::ZERO)
            .await
            .unwrap();
        // Touch "a" so "b" becomes least-recently-used.
        backend.get("a").await.unwrap();
        backend
            .put("c", Bytes::from_static(b"3"), Duration::ZERO)
            .await
            .unwrap();
        assert!(backend.get("b").await.is_err());
        assert!(backend.get("a").await.is_ok());
        assert!(backend.get("c").await.is_ok());
    }
}

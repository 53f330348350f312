//! Two-tier composite backend.
//!
//! Holds an ordered pair `(primary, secondary)`:
//!
//! - **Read**: consult primary; on [`BackendError::KeyNotFound`] consult
//!   secondary and, on hit, opportunistically write through to primary.
//!   The write-through is fire-and-forget — spawned onto the runtime rather
//!   than awaited — so a slow or unhealthy primary never adds latency to a
//!   read that already succeeded from secondary. Any write-through failure
//!   is logged and counted, never returned to the caller.
//! - **Write**: writes to both tiers; secondary is written first so primary
//!   acts as the authoritative presence check for put-if-absent collisions.
//!   Success requires both writes to succeed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::backend::{Backend, BackendResult};
use crate::error::BackendError;

/// A two-tier backend combining a fast primary with a fallback secondary.
pub struct CompositeBackend {
    primary: Arc<dyn Backend>,
    secondary: Arc<dyn Backend>,
    label: String,
}

impl CompositeBackend {
    /// Build a composite backend from its two tiers.
    pub fn new(primary: Arc<dyn Backend>, secondary: Arc<dyn Backend>) -> Self {
        let label = format!("composite({},{})", primary.label(), secondary.label());
        Self {
            primary,
            secondary,
            label,
        }
    }
}

#[async_trait]
impl Backend for CompositeBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        match self.primary.get(key).await {
            Ok(value) => Ok(value),
            Err(BackendError::KeyNotFound) => {
                let value = self.secondary.get(key).await?;
                let primary = Arc::clone(&self.primary);
                let fill_key = key.to_string();
                let fill_value = value.clone();
                tokio::spawn(async move {
                    if let Err(err) = primary.put(&fill_key, fill_value, Duration::ZERO).await {
                        warn!(
                            key = %fill_key,
                            error = %err,
                            "composite: write-through fill to primary failed, ignoring"
                        );
                    }
                });
                Ok(value)
            }
            Err(other) => Err(other),
        }
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        self.secondary.put(key, value.clone(), ttl).await?;
        self.primary.put(key, value, ttl).await
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend as _;
    use std::sync::Mutex;
    use std::collections::HashMap;

    struct MapBackend {
        label: &'static str,
        data: Mutex<HashMap<String, Bytes>>,
    }

    impl MapBackend {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl Backend for MapBackend {
        async fn get(&self, key: &str) -> BackendResult<Bytes> {
            self.data
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or(BackendError::KeyNotFound)
        }

        async fn put(&self, key: &str, value: Bytes, _ttl: Duration) -> BackendResult<()> {
            let mut data = self.data.lock().unwrap();
            if data.contains_key(key) {
                return Err(BackendError::RecordExists);
            }
            data.insert(key.to_string(), value);
            Ok(())
        }

        fn label(&self) -> &str {
            self.label
        }
    }

    #[tokio::test]
    async fn put_writes_both_tiers() {
        let primary = Arc::new(MapBackend::new("l1"));
        let secondary = Arc::new(MapBackend::new("l2"));
        let composite = CompositeBackend::new(primary.clone(), secondary.clone());

        composite
            .put("k", Bytes::from_static(b"v"), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(primary.get("k").await.unwrap(), Bytes::from_static(b"v"));
        assert_eq!(secondary.get("k").await.unwrap(), Bytes::from_static(b"v"));
    }

    #[tokio::test]
    async fn put_fails_if_either_tier_fails() {
        let primary = Arc::new(MapBackend::new("l1"));
        let secondary = Arc::new(MapBackend::new("l2"));
        secondary
            .put("k", Bytes::from_static(b"existing"), Duration::ZERO)
            .await
            .unwrap();
        let composite = CompositeBackend::new(primary.clone(), secondary.clone());

        let err = composite
            .put("k", Bytes::from_static(b"v"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::RecordExists));
        // Primary must not have been written since secondary failed first.
        assert!(primary.get("k").await.is_err());
    }

    #[tokio::test]
    async fn get_falls_back_to_secondary_and_fills_primary() {
        let primary = Arc::new(MapBackend::new("l1"));
        let secondary = Arc::new(MapBackend::new("l2"));
        secondary
            .put("k", Bytes::from_static(b"v"), Duration::ZERO)
            .await
            .unwrap();
        let composite = CompositeBackend::new(primary.clone(), secondary.clone());

        let value = composite.get("k").await.unwrap();
        assert_eq!(value, Bytes::from_static(b"v"));

        // Allow the fire-and-forget fill task to run.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(primary.get("k").await.unwrap(), Bytes::from_static(b"v"));
    }
}

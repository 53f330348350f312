//! Redis backend implementation.
//!
//! `SET key value EX ttl NX` expresses put-if-absent with TTL atomically in
//! a single round trip. A "nil" reply from `GET` is [`BackendError::KeyNotFound`].
//!
//! The connection is a multiplexed [`ConnectionManager`], established lazily
//! on first use so constructing a `RedisBackend` never blocks — the same
//! design hitbox's Redis driver uses, useful when this backend is the L2 of
//! a composite and L1 always hits.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::ConnectionManager, Client};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::trace;

use cache_backend::{Backend, BackendError, BackendResult};

use crate::error::Error;

/// Distributed cache backend powered by Redis.
pub struct RedisBackend {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    label: String,
}

impl RedisBackend {
    /// Connect (lazily) to `server`, a `redis://` connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Redis`] if `server` isn't a valid Redis URL. Actual
    /// connection failures surface lazily on the first `get`/`put`.
    pub fn new(server: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            client: Client::open(server.into())?,
            connection: OnceCell::new(),
            label: "redis".to_string(),
        })
    }

    /// Set a custom label for metrics/composite logs. Default: `"redis"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    async fn connection(&self) -> Result<ConnectionManager, Error> {
        trace!("redis: acquiring connection manager");
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("redis: initializing new connection manager");
                self.client.get_connection_manager()
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let mut con = self.connection().await.map_err(BackendError::from)?;
        let data: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?;
        data.map(Bytes::from).ok_or(BackendError::KeyNotFound)
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let mut con = self.connection().await.map_err(BackendError::from)?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value.as_ref()).arg("NX");
        if !ttl.is_zero() {
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }
        let reply: Option<String> = cmd
            .query_async(&mut con)
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?;
        match reply {
            Some(_) => Ok(()),
            None => Err(BackendError::RecordExists),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

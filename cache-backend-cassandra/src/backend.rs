//! Cassandra backend implementation.
//!
//! Put-if-absent is `INSERT ... IF NOT EXISTS USING TTL t`, a lightweight
//! transaction; the `[applied]` column in the response tells us whether the
//! row was actually written. A `SELECT` that returns no rows is
//! [`BackendError::KeyNotFound`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use scylla::{Session, SessionBuilder};

use cache_backend::{Backend, BackendError, BackendResult};

use crate::error::Error;

/// Cache backend powered by a Cassandra (or Cassandra-protocol-compatible)
/// cluster.
pub struct CassandraBackend {
    session: Arc<Session>,
    keyspace: String,
    table: String,
    label: String,
}

impl CassandraBackend {
    /// Connect to the cluster reachable through `known_nodes`, storing
    /// records in `keyspace.table` (both assumed to already exist — schema
    /// management is out of scope for this driver).
    pub async fn new(
        known_nodes: &[String],
        keyspace: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, Error> {
        let session = SessionBuilder::new()
            .known_nodes(known_nodes)
            .build()
            .await?;
        Ok(Self {
            session: Arc::new(session),
            keyspace: keyspace.into(),
            table: table.into(),
            label: "cassandra".to_string(),
        })
    }

    /// Set a custom label for metrics/composite logs. Default: `"cassandra"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn insert_cql(&self) -> String {
        format!(
            "INSERT INTO {}.{} (key, value) VALUES (?, ?) IF NOT EXISTS USING TTL ?",
            self.keyspace, self.table
        )
    }

    fn select_cql(&self) -> String {
        format!(
            "SELECT value FROM {}.{} WHERE key = ?",
            self.keyspace, self.table
        )
    }
}

#[async_trait]
impl Backend for CassandraBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let result = self
            .session
            .query_unpaged(self.select_cql(), (key,))
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?;

        let rows = result
            .into_rows_result()
            .map_err(|err| Error::RowShape(err.to_string()))
            .map_err(BackendError::from)?;

        let mut iter = rows
            .rows::<(Vec<u8>,)>()
            .map_err(|err| Error::RowShape(err.to_string()))
            .map_err(BackendError::from)?;

        match iter.next() {
            Some(Ok((value,))) => Ok(Bytes::from(value)),
            Some(Err(err)) => Err(BackendError::from(Error::RowShape(err.to_string()))),
            None => Err(BackendError::KeyNotFound),
        }
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let ttl_seconds = ttl.as_secs() as i32;
        let result = self
            .session
            .query_unpaged(self.insert_cql(), (key, value.to_vec(), ttl_seconds))
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?;

        let rows = result
            .into_rows_result()
            .map_err(|err| Error::RowShape(err.to_string()))
            .map_err(BackendError::from)?;

        let mut iter = rows
            .rows::<(bool,)>()
            .map_err(|err| Error::RowShape(err.to_string()))
            .map_err(BackendError::from)?;

        match iter.next() {
            Some(Ok((applied,))) if applied => Ok(()),
            Some(Ok(_)) => Err(BackendError::RecordExists),
            Some(Err(err)) => Err(BackendError::from(Error::RowShape(err.to_string()))),
            None => Err(BackendError::from(Error::RowShape(
                "lightweight transaction returned no rows".to_string(),
            ))),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

//! Aerospike backend implementation.
//!
//! The upstream client is synchronous, so every call is dispatched through
//! [`tokio::task::spawn_blocking`] the way a blocking database driver is
//! normally bridged into an async runtime. Put-if-absent is expressed with
//! [`RecordExistsAction::CreateOnly`]; the framed payload lives in a single
//! bin so the record shape matches the driver's "one bin holds the value"
//! contract.

use std::sync::Arc;
use std::time::Duration;

use aerospike::{
    as_bin, as_key, Client, ClientPolicy, Expiration, ReadPolicy, RecordExistsAction, ResultCode,
    WritePolicy,
};
use async_trait::async_trait;
use bytes::Bytes;

use cache_backend::{Backend, BackendError, BackendResult};

use crate::error::Error;

const BIN_NAME: &str = "v";

/// Cache backend powered by an Aerospike cluster.
pub struct AerospikeBackend {
    client: Arc<Client>,
    namespace: String,
    set: String,
    label: String,
}

impl AerospikeBackend {
    /// Connect to the cluster described by `hosts` (Aerospike's
    /// `host1:port1,host2:port2` seed syntax), storing records under
    /// `namespace`/`set`.
    pub fn new(
        hosts: impl Into<String>,
        namespace: impl Into<String>,
        set: impl Into<String>,
    ) -> Result<Self, Error> {
        let policy = ClientPolicy::default();
        let client = Client::new(&policy, &hosts.into())?;
        Ok(Self {
            client: Arc::new(client),
            namespace: namespace.into(),
            set: set.into(),
            label: "aerospike".to_string(),
        })
    }

    /// Set a custom label for metrics/composite logs. Default: `"aerospike"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[async_trait]
impl Backend for AerospikeBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let client = Arc::clone(&self.client);
        let as_key = as_key!(self.namespace.clone(), self.set.clone(), key.to_string());
        let record = tokio::task::spawn_blocking(move || {
            client.get(&ReadPolicy::default(), &as_key, aerospike::Bins::All)
        })
        .await
        .map_err(Error::from)
        .map_err(BackendError::from)?;

        let record = match record {
            Ok(record) => record,
            Err(err) => {
                if matches!(err, aerospike::Error::ServerError(ResultCode::KeyNotFoundError)) {
                    return Err(BackendError::KeyNotFound);
                }
                return Err(BackendError::from(Error::from(err)));
            }
        };

        let value = record
            .bins
            .get(BIN_NAME)
            .ok_or_else(|| Error::MissingBin(BIN_NAME.to_string()))
            .map_err(BackendError::from)?;

        match value {
            aerospike::Value::Blob(bytes) => Ok(Bytes::from(bytes.clone())),
            other => Err(BackendError::from(Error::MissingBin(format!(
                "bin {BIN_NAME:?} had unexpected type {other:?}"
            )))),
        }
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let client = Arc::clone(&self.client);
        let as_key = as_key!(self.namespace.clone(), self.set.clone(), key.to_string());
        let bin = as_bin!(BIN_NAME, value.to_vec());
        let mut policy = WritePolicy::default();
        policy.record_exists_action = RecordExistsAction::CreateOnly;
        policy.expiration = if ttl.is_zero() {
            Expiration::NamespaceDefault
        } else {
            Expiration::Seconds(ttl.as_secs() as u32)
        };

        let result = tokio::task::spawn_blocking(move || {
            client.put(&policy, &as_key, &[bin])
        })
        .await
        .map_err(Error::from)
        .map_err(BackendError::from)?;

        match result {
            Ok(()) => Ok(()),
            Err(aerospike::Error::ServerError(ResultCode::KeyExistsError)) => {
                Err(BackendError::RecordExists)
            }
            Err(err) => Err(BackendError::from(Error::from(err))),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

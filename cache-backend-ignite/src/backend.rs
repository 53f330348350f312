//! Ignite backend implementation.
//!
//! Talks to Ignite's REST API (`/ignite?cmd=...`) rather than a binary
//! client protocol. `cmd=putifabs` is the put-if-absent primitive, reported
//! back as a boolean `"true"`/`"false"` string in the `response` field.
//! `cmd=get` returns the stored value base64-encoded in `response`, or an
//! empty `response` for a miss. TTL is milliseconds on the wire even though
//! every other driver in this workspace takes seconds.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::Deserialize;

use cache_backend::{Backend, BackendError, BackendResult};

use crate::error::Error;

#[derive(Debug, Deserialize)]
struct IgniteResponse {
    error: String,
    response: Option<String>,
    #[serde(rename = "successStatus")]
    success_status: i64,
}

impl IgniteResponse {
    fn into_response(self) -> Result<Option<String>, Error> {
        if self.success_status != 0 || !self.error.is_empty() {
            return Err(Error::Server {
                success_status: self.success_status,
                message: self.error,
            });
        }
        Ok(self.response)
    }
}

/// Cache backend powered by Apache Ignite's REST API.
pub struct IgniteBackend {
    client: reqwest::Client,
    base_url: String,
    cache_name: String,
    label: String,
}

impl IgniteBackend {
    /// Point at `base_url` (e.g. `https://ignite.internal:8080`), storing
    /// records in `cache_name`. TLS certificate validation follows
    /// `insecure_tls`: when `true`, invalid certificates are accepted — use
    /// only for trusted internal clusters with self-signed certs.
    pub fn new(
        base_url: impl Into<String>,
        cache_name: impl Into<String>,
        insecure_tls: bool,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_tls)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            cache_name: cache_name.into(),
            label: "ignite".to_string(),
        })
    }

    /// Set a custom label for metrics/composite logs. Default: `"ignite"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Issue `cmd=getorcreate` so the configured cache exists before traffic
    /// arrives. Call once at bootstrap; idempotent.
    pub async fn ensure_cache(&self) -> Result<(), Error> {
        let url = format!("{}/ignite", self.base_url);
        let envelope: IgniteResponse = self
            .client
            .get(url)
            .query(&[("cmd", "getorcreate"), ("cacheName", self.cache_name.as_str())])
            .send()
            .await?
            .json()
            .await?;
        envelope.into_response()?;
        Ok(())
    }
}

#[async_trait]
impl Backend for IgniteBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let url = format!("{}/ignite", self.base_url);
        let envelope: IgniteResponse = self
            .client
            .get(url)
            .query(&[
                ("cmd", "get"),
                ("cacheName", self.cache_name.as_str()),
                ("key", key),
            ])
            .send()
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?
            .json()
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?;

        let response = envelope.into_response().map_err(BackendError::from)?;
        let encoded = response.filter(|v| !v.is_empty()).ok_or(BackendError::KeyNotFound)?;
        let decoded = BASE64
            .decode(encoded)
            .map_err(|err| Error::Malformed(err.to_string()))
            .map_err(BackendError::from)?;
        Ok(Bytes::from(decoded))
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let encoded = BASE64.encode(value.as_ref());
        let exp_ms = ttl.as_millis().to_string();
        let url = format!("{}/ignite", self.base_url);
        let envelope: IgniteResponse = self
            .client
            .get(url)
            .query(&[
                ("cmd", "putifabs"),
                ("cacheName", self.cache_name.as_str()),
                ("key", key),
                ("val", encoded.as_str()),
                ("exp", exp_ms.as_str()),
            ])
            .send()
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?
            .json()
            .await
            .map_err(Error::from)
            .map_err(BackendError::from)?;

        let response = envelope.into_response().map_err(BackendError::from)?;
        match response.as_deref() {
            Some("true") => Ok(()),
            Some("false") => Err(BackendError::RecordExists),
            other => Err(BackendError::from(Error::Malformed(format!(
                "unexpected putifabs response {other:?}"
            )))),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

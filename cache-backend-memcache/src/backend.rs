//! Memcached backend implementation.
//!
//! Speaks the classic memcached text protocol directly over a single
//! lazily-established [`TcpStream`], the same "connect on first use"
//! posture as the Redis driver. Uses the `add` verb for put-if-absent
//! (memcached's own native compare-and-set-on-absence primitive) and `get`
//! for reads. TTL is seconds, passed straight through as the protocol's
//! `exptime` field.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use cache_backend::{Backend, BackendError, BackendResult};

use crate::error::Error;

/// Cache backend powered by a Memcached server.
pub struct MemcacheBackend {
    addr: String,
    conn: Mutex<Option<BufReader<TcpStream>>>,
    label: String,
}

impl MemcacheBackend {
    /// Create a backend that will lazily connect to `addr` (`host:port`).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            conn: Mutex::new(None),
            label: "memcache".to_string(),
        }
    }

    /// Set a custom label for metrics/composite logs. Default: `"memcache"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    async fn with_connection<F, Fut, T>(&self, op: F) -> Result<T, Error>
    where
        F: FnOnce(&mut BufReader<TcpStream>) -> Fut,
        Fut: std::future::Future<Output = Result<T, Error>>,
    {
        let mut guard = self.conn.lock().await;
        if guard.is_none() {
            let stream = TcpStream::connect(&self.addr).await?;
            cache_metrics::connection_opened();
            *guard = Some(BufReader::new(stream));
        }
        let stream = guard.as_mut().expect("connection just established");
        match op(stream).await {
            Ok(value) => Ok(value),
            Err(err) => {
                // Drop the connection on any protocol-level failure so the
                // next call reconnects rather than replaying garbage state.
                *guard = None;
                cache_metrics::connection_error();
                cache_metrics::connection_closed();
                Err(err)
            }
        }
    }
}

impl Drop for MemcacheBackend {
    fn drop(&mut self) {
        if self.conn.get_mut().is_some() {
            cache_metrics::connection_closed();
        }
    }
}

async fn read_line(stream: &mut BufReader<TcpStream>) -> Result<String, Error> {
    let mut line = Vec::new();
    loop {
        let byte = stream.read_u8().await?;
        if byte == b'\n' {
            break;
        }
        if byte != b'\r' {
            line.push(byte);
        }
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

#[async_trait]
impl Backend for MemcacheBackend {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let key = key.to_string();
        let result = self
            .with_connection(move |stream| {
                let key = key.clone();
                async move {
                    stream
                        .get_mut()
                        .write_all(format!("get {key}\r\n").as_bytes())
                        .await?;
                    let header = read_line(stream).await?;
                    if header == "END" {
                        return Ok(None);
                    }
                    let mut parts = header.split_whitespace();
                    match (parts.next(), parts.next(), parts.next(), parts.next()) {
                        (Some("VALUE"), Some(_key), Some(_flags), Some(len)) => {
                            let len: usize = len
                                .parse()
                                .map_err(|_| Error::Protocol(format!("bad length in {header:?}")))?;
                            let mut data = vec![0u8; len];
                            stream.get_mut().read_exact(&mut data).await?;
                            // trailing \r\n after the data block
                            let _ = read_line(stream).await?;
                            let end = read_line(stream).await?;
                            if end != "END" {
                                return Err(Error::Protocol(format!(
                                    "expected END, got {end:?}"
                                )));
                            }
                            Ok(Some(Bytes::from(data)))
                        }
                        _ => Err(Error::Protocol(format!("unexpected get reply {header:?}"))),
                    }
                }
            })
            .await
            .map_err(BackendError::from)?;
        result.ok_or(BackendError::KeyNotFound)
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let key = key.to_string();
        let exptime = ttl.as_secs();
        let stored = self
            .with_connection(move |stream| {
                let key = key.clone();
                let value = value.clone();
                async move {
                    let header = format!("add {key} 0 {exptime} {}\r\n", value.len());
                    stream.get_mut().write_all(header.as_bytes()).await?;
                    stream.get_mut().write_all(&value).await?;
                    stream.get_mut().write_all(b"\r\n").await?;
                    let reply = read_line(stream).await?;
                    match reply.as_str() {
                        "STORED" => Ok(true),
                        "NOT_STORED" => Ok(false),
                        other => Err(Error::Protocol(format!("unexpected add reply {other:?}"))),
                    }
                }
            })
            .await
            .map_err(BackendError::from)?;
        if stored {
            Ok(())
        } else {
            Err(BackendError::RecordExists)
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

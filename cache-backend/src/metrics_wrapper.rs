//! Metrics decorator.
//!
//! Wraps any [`Backend`] and records count, latency and outcome for every
//! call, observing the outcome of whatever is nested inside it — when
//! composed outermost around a [`crate::rate_limit_wrapper::RateLimitedBackend`]
//! wrapper, that means it observes `RateLimited` denials too.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};

use cache_core::CacheErrorKind;

use crate::backend::{Backend, BackendResult};
use crate::error::{BackendError, Operation};

/// Decorates an inner [`Backend`], recording `request_total` and
/// `request_duration_seconds` for every `get`/`put` call.
pub struct MetricsBackend<B> {
    inner: B,
}

impl<B> MetricsBackend<B> {
    /// Wrap `inner` with metrics recording.
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

fn outcome_kind(err: &BackendError, op: Operation) -> CacheErrorKind {
    match err {
        BackendError::KeyNotFound => CacheErrorKind::KeyNotFound,
        BackendError::RecordExists => CacheErrorKind::RecordExists,
        BackendError::RateLimited => CacheErrorKind::RateLimited,
        BackendError::Connection(_) | BackendError::Internal(_) => match op {
            Operation::Get => CacheErrorKind::GetInternal,
            Operation::Put => CacheErrorKind::PutInternal,
        },
    }
}

fn record<T>(result: &BackendResult<T>, op: Operation, duration: Duration) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => outcome_kind(e, op).metrics_outcome(),
    };
    let op_label = match op {
        Operation::Get => "get",
        Operation::Put => "put",
    };
    cache_metrics::record_request(op_label, outcome, duration);
}

#[async_trait]
impl<B: Backend> Backend for MetricsBackend<B> {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        let start = Instant::now();
        let result = self.inner.get(key).await;
        record(&result, Operation::Get, start.elapsed());
        result
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let start = Instant::now();
        let result = self.inner.put(key, value, ttl).await;
        record(&result, Operation::Put, start.elapsed());
        result
    }

    fn label(&self) -> &str {
        self.inner.label()
    }
}

//! Rate-limiting decorator.
//!
//! On `put`, consults the shared [`RateLimiter`]; on denial returns
//! [`BackendError::RateLimited`] without ever touching the wrapped backend.
//! `get` is never rate-limited and passes straight through.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use cache_limiter::RateLimiter;

use crate::backend::{Backend, BackendResult};
use crate::error::BackendError;

/// Decorates an inner [`Backend`], gating `put` behind a shared
/// [`RateLimiter`]. `get` always passes through untouched.
pub struct RateLimitedBackend<B> {
    inner: B,
    limiter: Arc<RateLimiter>,
}

impl<B> RateLimitedBackend<B> {
    /// Wrap `inner`, gating writes with `limiter`.
    pub fn new(inner: B, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }
}

#[async_trait]
impl<B: Backend> Backend for RateLimitedBackend<B> {
    async fn get(&self, key: &str) -> BackendResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        if !self.limiter.try_acquire() {
            return Err(BackendError::RateLimited);
        }
        self.inner.put(key, value, ttl).await
    }

    fn label(&self) -> &str {
        self.inner.label()
    }
}

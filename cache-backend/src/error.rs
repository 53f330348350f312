//! Backend-facing error type.
//!
//! Drivers speak [`BackendError`], a small closed set distinct from
//! [`cache_core::CacheError`]: the backend layer only needs to distinguish
//! "key not found", "key already bound" and "everything else failed", the
//! last of which the caller (a decorator or the write/read handler) maps to
//! `PutInternal`/`GetInternal` depending on which operation was in flight.

use cache_core::{CacheError, CacheErrorKind};
use thiserror::Error;

/// Errors a [`crate::Backend`] implementation can return.
#[derive(Debug, Error)]
pub enum BackendError {
    /// `Get` found no binding for the key. Not an empty success.
    #[error("key not found")]
    KeyNotFound,

    /// `Put` found the key already bound to a record (put-if-absent
    /// collision).
    #[error("record already exists")]
    RecordExists,

    /// Network/transport failure talking to the backend.
    #[error("backend connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Any other backend-internal failure (protocol error, unexpected
    /// response shape, driver bug).
    #[error("backend internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The rate limiter denied this `put` attempt before the backend was
    /// ever touched. Always maps to `CacheErrorKind::RateLimited`
    /// regardless of operation.
    #[error("rate limited")]
    RateLimited,
}

/// Which operation was in flight when a [`BackendError`] occurred, so it can
/// be mapped to the right [`cache_core::CacheErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A `Get` call.
    Get,
    /// A `Put` call.
    Put,
}

impl BackendError {
    /// Map this backend error to the stable [`CacheErrorKind`] taxonomy
    /// callers and metrics speak, given which operation produced it.
    pub fn into_cache_error(self, op: Operation) -> CacheError {
        match self {
            BackendError::KeyNotFound => {
                CacheError::new(CacheErrorKind::KeyNotFound, "key not found")
            }
            BackendError::RecordExists => {
                CacheError::new(CacheErrorKind::RecordExists, "record already exists")
            }
            BackendError::Connection(source) => {
                let kind = match op {
                    Operation::Get => CacheErrorKind::GetInternal,
                    Operation::Put => CacheErrorKind::PutInternal,
                };
                CacheError::with_source(kind, "backend connection error", ErrorWrapper(source))
            }
            BackendError::Internal(source) => {
                let kind = match op {
                    Operation::Get => CacheErrorKind::GetInternal,
                    Operation::Put => CacheErrorKind::PutInternal,
                };
                CacheError::with_source(kind, "backend internal error", ErrorWrapper(source))
            }
            BackendError::RateLimited => {
                CacheError::new(CacheErrorKind::RateLimited, "rate limited")
            }
        }
    }
}

#[derive(Debug)]
struct ErrorWrapper(Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ErrorWrapper {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

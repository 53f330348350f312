//! Error types for the Redis backend.
//!
//! Wraps errors from the underlying [`redis`] crate and converts them into
//! [`BackendError`] for uniform handling alongside every other driver.

use cache_backend::BackendError;
use redis::RedisError;

/// Error type for Redis backend operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client: connection failures,
    /// protocol errors, authentication failures, command errors.
    #[error("redis backend error: {0}")]
    Redis(#[from] RedisError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Redis(e) if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() => {
                BackendError::Connection(Box::new(error))
            }
            Error::Redis(_) => BackendError::Internal(Box::new(error)),
        }
    }
}

//! Error types for the Memcached backend.

use cache_backend::BackendError;

/// Error type for Memcached backend operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure talking to the Memcached server.
    #[error("memcached io error: {0}")]
    Io(#[from] std::io::Error),

    /// The server replied with something other than the expected verb
    /// response (`STORED`, `NOT_STORED`, `VALUE`/`END`).
    #[error("unexpected memcached reply: {0}")]
    Protocol(String),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Io(_) => BackendError::Connection(Box::new(error)),
            Error::Protocol(_) => BackendError::Internal(Box::new(error)),
        }
    }
}

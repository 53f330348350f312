//! Error types for the Aerospike backend.

use cache_backend::BackendError;

/// Error type for Aerospike backend operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client call itself failed (network, cluster, auth, server error).
    #[error("aerospike client error: {0}")]
    Client(#[from] aerospike::Error),

    /// The record came back without the bin this backend writes to.
    #[error("aerospike record missing bin {0:?}")]
    MissingBin(String),

    /// The blocking client call was dropped before it could complete.
    #[error("aerospike worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Client(_) | Error::Join(_) => BackendError::Connection(Box::new(error)),
            Error::MissingBin(_) => BackendError::Internal(Box::new(error)),
        }
    }
}

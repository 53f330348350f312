//! Error types for the Cassandra backend.

use cache_backend::BackendError;

/// Error type for Cassandra backend operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to establish or use a session with the cluster.
    #[error("cassandra connection error: {0}")]
    Connection(#[from] scylla::transport::errors::NewSessionError),

    /// A prepared statement failed to execute.
    #[error("cassandra query error: {0}")]
    Query(#[from] scylla::transport::errors::QueryError),

    /// The row shape returned by a `SELECT` didn't match what this driver
    /// expects (missing or mistyped column).
    #[error("unexpected cassandra row shape: {0}")]
    RowShape(String),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Connection(_) => BackendError::Connection(Box::new(error)),
            Error::Query(_) | Error::RowShape(_) => BackendError::Internal(Box::new(error)),
        }
    }
}

//! Error types for the Ignite REST backend.

use cache_backend::BackendError;

/// Error type for Ignite backend operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request itself failed (dial, TLS, timeout).
    #[error("ignite http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-empty `error` field in the response
    /// envelope.
    #[error("ignite server error (status {success_status}): {message}")]
    Server {
        /// Ignite's `successStatus` field; `0` means success.
        success_status: i64,
        /// Ignite's `error` field.
        message: String,
    },

    /// The `response` field wasn't valid base64, or decoded to something
    /// that isn't a framed record.
    #[error("malformed ignite response payload: {0}")]
    Malformed(String),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Http(_) => BackendError::Connection(Box::new(error)),
            Error::Server { .. } | Error::Malformed(_) => BackendError::Internal(Box::new(error)),
        }
    }
}

//! Bounds a backend call by the configured per-request timeout.
//!
//! A deadline is advisory until it isn't: once `timeout_ms` elapses the
//! in-flight backend future is dropped (cancelling it) and the caller sees
//! a regular [`BackendError::Internal`], which the handler maps to a 5xx
//! exactly as it would any other backend failure.

use std::time::Duration;

use cache_backend::BackendError;

/// Run `fut` to completion, or fail it once `timeout_ms` milliseconds pass.
/// `None` means unbounded.
pub async fn bound<T, F>(timeout_ms: Option<u64>, fut: F) -> Result<T, BackendError>
where
    F: std::future::Future<Output = Result<T, BackendError>>,
{
    match timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), fut)
            .await
            .unwrap_or_else(|_| Err(BackendError::Internal(Box::new(DeadlineExceeded)))),
        None => fut.await,
    }
}

#[derive(Debug)]
struct DeadlineExceeded;

impl std::fmt::Display for DeadlineExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request deadline exceeded")
    }
}

impl std::error::Error for DeadlineExceeded {}

#![warn(missing_docs)]
//! Backend abstraction for the auction cache: the trait every storage
//! driver implements, the metrics/rate-limit decorators that wrap any of
//! them, and the two-tier composite backend.

mod backend;
mod composite;
mod error;
mod metrics_wrapper;
mod rate_limit_wrapper;

pub use backend::{Backend, BackendResult};
pub use composite::CompositeBackend;
pub use error::{BackendError, Operation};
pub use metrics_wrapper::MetricsBackend;
pub use rate_limit_wrapper::RateLimitedBackend;

//! The closed error taxonomy shared by every backend driver and handler.
//!
//! Every fallible path in the workspace eventually produces a
//! [`CacheErrorKind`]. The kind is stable and maps 1:1 to an HTTP status via
//! [`CacheErrorKind::status`], so the taxonomy never grows new meanings
//! silently — adding an outcome means touching this file.

use thiserror::Error;

/// One entry per outcome the service can report to a caller or count in
/// metrics. Kept deliberately small and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheErrorKind {
    /// `GET` for an identifier that was never written, or has expired.
    KeyNotFound,
    /// Put-if-absent collision on a caller-chosen key.
    RecordExists,
    /// `GET` with no or empty `uuid` query parameter.
    MissingKey,
    /// Envelope or per-element validation failure.
    MalformedRequest,
    /// Caller-chosen key supplied without a valid write-authorization secret.
    UnauthorizedKey,
    /// `puts` array longer than `max_num_values`.
    TooMany,
    /// Serialized payload larger than `max_size_bytes`.
    TooLarge,
    /// `ttlseconds` was negative.
    NegativeTTL,
    /// Rate limiter denied the attempt.
    RateLimited,
    /// Backend error surfaced while writing.
    PutInternal,
    /// Backend error surfaced while reading.
    GetInternal,
    /// Codec/serialization failure.
    MarshalError,
}

impl CacheErrorKind {
    /// Short, stable, lowercase name used as a metrics label and in response
    /// bodies. Never changes once shipped.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheErrorKind::KeyNotFound => "key_not_found",
            CacheErrorKind::RecordExists => "record_exists",
            CacheErrorKind::MissingKey => "missing_key",
            CacheErrorKind::MalformedRequest => "malformed_request",
            CacheErrorKind::UnauthorizedKey => "unauthorized_key",
            CacheErrorKind::TooMany => "too_many",
            CacheErrorKind::TooLarge => "too_large",
            CacheErrorKind::NegativeTTL => "negative_ttl",
            CacheErrorKind::RateLimited => "rate_limited",
            CacheErrorKind::PutInternal => "put_internal",
            CacheErrorKind::GetInternal => "get_internal",
            CacheErrorKind::MarshalError => "marshal_error",
        }
    }

    /// Metrics outcome label: `ok|bad_request|not_found|exists|rate_limited|backend_error`.
    pub fn metrics_outcome(&self) -> &'static str {
        match self {
            CacheErrorKind::KeyNotFound => "not_found",
            CacheErrorKind::RecordExists => "exists",
            CacheErrorKind::MissingKey
            | CacheErrorKind::MalformedRequest
            | CacheErrorKind::UnauthorizedKey
            | CacheErrorKind::TooMany
            | CacheErrorKind::TooLarge
            | CacheErrorKind::NegativeTTL => "bad_request",
            CacheErrorKind::RateLimited => "rate_limited",
            CacheErrorKind::PutInternal
            | CacheErrorKind::GetInternal
            | CacheErrorKind::MarshalError => "backend_error",
        }
    }

    /// HTTP status code this kind maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            CacheErrorKind::KeyNotFound => 404,
            CacheErrorKind::RecordExists
            | CacheErrorKind::MissingKey
            | CacheErrorKind::MalformedRequest
            | CacheErrorKind::UnauthorizedKey
            | CacheErrorKind::TooMany
            | CacheErrorKind::TooLarge
            | CacheErrorKind::NegativeTTL => 400,
            CacheErrorKind::RateLimited => 429,
            CacheErrorKind::PutInternal
            | CacheErrorKind::GetInternal
            | CacheErrorKind::MarshalError => 500,
        }
    }
}

/// The error value propagated through backend, decorator and handler code.
///
/// Carries a stable [`CacheErrorKind`] plus a human-readable reason for logs
/// and the short textual category returned to clients on 5xx.
#[derive(Debug, Error)]
#[error("{kind}: {reason}", kind = self.kind.as_str())]
pub struct CacheError {
    kind: CacheErrorKind,
    reason: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CacheError {
    /// Build an error of the given kind with a reason string.
    pub fn new(kind: CacheErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            source: None,
        }
    }

    /// Attach a source error, preserving the original cause for logs while
    /// keeping the stable kind as the only thing callers match on.
    pub fn with_source(
        kind: CacheErrorKind,
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The stable kind, for dispatch and metrics.
    pub fn kind(&self) -> CacheErrorKind {
        self.kind
    }

    /// Short textual reason, safe to return to a client.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

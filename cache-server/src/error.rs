//! [`axum::response::IntoResponse`] for the cache's closed error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use cache_core::CacheError;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    reason: &'a str,
}

impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.kind().as_str(),
            reason: self.reason(),
        };
        (status, Json(body)).into_response()
    }
}

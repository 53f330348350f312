//! `GET /cache?uuid=<id>`: fetch a stored record and serve its raw payload
//! under its original content type.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use cache_backend::Operation;
use cache_core::record::Record;
use cache_core::{CacheError, CacheErrorKind};

use crate::state::CacheState;

/// Query parameters accepted by `GET /cache`.
#[derive(Deserialize)]
pub struct ReadQuery {
    #[serde(default)]
    uuid: Option<String>,
}

/// `GET /cache` handler.
pub async fn get(
    State(state): State<CacheState>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, CacheError> {
    let uuid = query
        .uuid
        .filter(|uuid| !uuid.is_empty())
        .ok_or_else(|| CacheError::new(CacheErrorKind::MissingKey, "missing or empty uuid"))?;

    let raw = crate::deadline::bound(state.server.read_timeout_ms, state.backend.get(&uuid))
        .await
        .map_err(|err| err.into_cache_error(Operation::Get))?;

    let (media_type, payload) = Record::unframe(&raw)?;
    Ok((
        [(header::CONTENT_TYPE, media_type.content_type())],
        payload.to_vec(),
    )
        .into_response())
}

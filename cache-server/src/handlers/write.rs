//! `POST /cache`: validate a batch of puts, frame and store each, respond
//! with the assigned identifiers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use serde_json::Value;

use cache_backend::Operation;
use cache_core::record::{MediaType, Record};
use cache_core::{CacheError, CacheErrorKind};

use crate::state::CacheState;

const WRITE_SECRET_HEADER: &str = "x-cache-write-secret";

/// One element of the `responses` array: the identifier the element ended
/// up stored under, whether server-assigned or caller-chosen.
#[derive(serde::Serialize)]
pub struct PutResponse {
    uuid: String,
}

/// `POST /cache` handler.
pub async fn put(
    State(state): State<CacheState>,
    headers: HeaderMap,
    Json(envelope): Json<Value>,
) -> Result<Json<serde_json::Map<String, Value>>, CacheError> {
    let puts = envelope
        .get("puts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CacheError::new(CacheErrorKind::MalformedRequest, "\"puts\" must be an array")
        })?;

    if puts.len() > state.server.max_num_values {
        return Err(CacheError::new(
            CacheErrorKind::TooMany,
            format!(
                "puts length {} exceeds max_num_values {}",
                puts.len(),
                state.server.max_num_values
            ),
        ));
    }

    let mut responses = Vec::with_capacity(puts.len());
    for element in puts {
        let uuid = put_one(&state, &headers, element).await?;
        responses.push(PutResponse { uuid });
    }

    let mut body = serde_json::Map::new();
    body.insert(
        "responses".to_string(),
        serde_json::to_value(responses).expect("PutResponse always serializes"),
    );
    Ok(Json(body))
}

async fn put_one(
    state: &CacheState,
    headers: &HeaderMap,
    element: &Value,
) -> Result<String, CacheError> {
    let media_type = element
        .get("type")
        .and_then(Value::as_str)
        .and_then(MediaType::from_request_type)
        .ok_or_else(|| {
            CacheError::new(
                CacheErrorKind::MalformedRequest,
                "\"type\" must be \"json\" or \"xml\"",
            )
        })?;

    let ttl_seconds = element.get("ttlseconds").and_then(Value::as_i64).ok_or_else(|| {
        CacheError::new(CacheErrorKind::MalformedRequest, "\"ttlseconds\" must be an integer")
    })?;
    if ttl_seconds < 0 {
        return Err(CacheError::new(
            CacheErrorKind::NegativeTTL,
            format!("ttlseconds {ttl_seconds} is negative"),
        ));
    }
    let capped_seconds = if state.ttl.max_ttl_seconds > 0 {
        (ttl_seconds as u64).min(state.ttl.max_ttl_seconds)
    } else {
        ttl_seconds as u64
    };
    let ttl = std::time::Duration::from_secs(capped_seconds);

    let value = element
        .get("value")
        .ok_or_else(|| CacheError::new(CacheErrorKind::MalformedRequest, "\"value\" is required"))?;
    let payload: Bytes = match media_type {
        MediaType::Json => Bytes::from(serde_json::to_vec(value).map_err(|err| {
            CacheError::with_source(CacheErrorKind::MalformedRequest, "value is not valid JSON", err)
        })?),
        MediaType::Xml => {
            let text = value.as_str().ok_or_else(|| {
                CacheError::new(
                    CacheErrorKind::MalformedRequest,
                    "\"value\" must be a string for type \"xml\"",
                )
            })?;
            Bytes::copy_from_slice(text.as_bytes())
        }
    };
    if payload.len() > state.server.max_size_bytes {
        return Err(CacheError::new(
            CacheErrorKind::TooLarge,
            format!(
                "payload of {} bytes exceeds max_size_bytes {}",
                payload.len(),
                state.server.max_size_bytes
            ),
        ));
    }

    let key = match element.get("key").and_then(Value::as_str) {
        Some(key) if !key.is_empty() => {
            authorize_caller_key(state, headers)?;
            key.to_string()
        }
        _ => state.ids.generate(),
    };

    let framed = Record::new(media_type, payload).frame();
    crate::deadline::bound(state.server.write_timeout_ms, state.backend.put(&key, framed, ttl))
        .await
        .map_err(|err| err.into_cache_error(Operation::Put))?;

    Ok(key)
}

fn authorize_caller_key(state: &CacheState, headers: &HeaderMap) -> Result<(), CacheError> {
    if !state.server.allow_keys {
        return Err(CacheError::new(
            CacheErrorKind::UnauthorizedKey,
            "caller-chosen keys are disabled",
        ));
    }
    let configured = state.server.api_key.as_deref().ok_or_else(|| {
        CacheError::new(
            CacheErrorKind::UnauthorizedKey,
            "no write-authorization secret is configured",
        )
    })?;
    let supplied = headers
        .get(WRITE_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if supplied == Some(configured) {
        Ok(())
    } else {
        Err(CacheError::new(
            CacheErrorKind::UnauthorizedKey,
            "missing or invalid write-authorization secret",
        ))
    }
}

use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cache_backend_memory::MemoryBackend;
use cache_config::{ServerSettings, TtlSettings};
use cache_core::IdentifierGenerator;
use cache_server::state::CacheState;

fn test_state() -> CacheState {
    CacheState {
        backend: Arc::new(MemoryBackend::new(NonZeroUsize::new(64).unwrap())),
        server: ServerSettings {
            max_num_values: 3,
            max_size_bytes: 1024,
            allow_keys: true,
            api_key: Some("sekret".to_string()),
            ..Default::default()
        },
        ttl: TtlSettings {
            max_ttl_seconds: 0,
            extra_ttl_seconds: 0,
        },
        ids: IdentifierGenerator::new(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is valid JSON")
}

#[tokio::test]
async fn json_round_trip() {
    let app = cache_server::cache_app(test_state());

    let put_body = json!({ "puts": [ { "type": "json", "value": {"a": 1}, "ttlseconds": 60 } ] });
    let response = app
        .clone()
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let uuid = body["responses"][0]["uuid"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::get(format!("/cache?uuid={uuid}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, json!({"a": 1}));
}

#[tokio::test]
async fn xml_round_trip() {
    let app = cache_server::cache_app(test_state());

    let put_body = json!({ "puts": [ { "type": "xml", "value": "<x/>", "ttlseconds": 60 } ] });
    let response = app
        .clone()
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let uuid = body["responses"][0]["uuid"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::get(format!("/cache?uuid={uuid}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/xml"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<x/>");
}

#[tokio::test]
async fn unknown_key_is_404() {
    let app = cache_server::cache_app(test_state());
    let response = app
        .oneshot(
            Request::get("/cache?uuid=00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_uuid_is_400() {
    let app = cache_server::cache_app(test_state());
    let response = app
        .oneshot(Request::get("/cache").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn caller_chosen_key_without_secret_is_unauthorized() {
    let app = cache_server::cache_app(test_state());
    let put_body = json!({ "puts": [ { "type": "json", "value": 1, "key": "abc", "ttlseconds": 60 } ] });
    let response = app
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized_key");
}

#[tokio::test]
async fn duplicate_caller_chosen_key_is_rejected() {
    let app = cache_server::cache_app(test_state());
    let put_body =
        json!({ "puts": [ { "type": "json", "value": 1, "key": "dup", "ttlseconds": 60 } ] });

    let first = app
        .clone()
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .header("x-cache-write-secret", "sekret")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_json(first).await;
    assert_eq!(first_body["responses"][0]["uuid"], "dup");

    let second = app
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .header("x-cache-write-secret", "sekret")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let second_body = body_json(second).await;
    assert_eq!(second_body["error"], "record_exists");
}

#[tokio::test]
async fn too_many_puts_is_rejected() {
    let app = cache_server::cache_app(test_state());
    let puts: Vec<Value> = (0..4)
        .map(|i| json!({ "type": "json", "value": i, "ttlseconds": 60 }))
        .collect();
    let put_body = json!({ "puts": puts });
    let response = app
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "too_many");
}

#[tokio::test]
async fn negative_ttl_is_rejected() {
    let app = cache_server::cache_app(test_state());
    let put_body = json!({ "puts": [ { "type": "json", "value": 1, "ttlseconds": -1 } ] });
    let response = app
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "negative_ttl");
}

#[tokio::test]
async fn oversized_payload_is_rejected() {
    let app = cache_server::cache_app(test_state());
    let huge = "x".repeat(2048);
    let put_body = json!({ "puts": [ { "type": "xml", "value": huge, "ttlseconds": 60 } ] });
    let response = app
        .oneshot(
            Request::post("/cache")
                .header("content-type", "application/json")
                .body(Body::from(put_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "too_large");
}

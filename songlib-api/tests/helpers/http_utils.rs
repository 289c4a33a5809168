//! Router and request helpers

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use songlib_api::enrichment::SongInfoProvider;
use songlib_api::{build_router, AppState};
use sqlx::SqlitePool;
use std::sync::Arc;

pub fn test_app(pool: SqlitePool, song_info: Arc<dyn SongInfoProvider>) -> Router {
    build_router(AppState::new(pool, song_info))
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

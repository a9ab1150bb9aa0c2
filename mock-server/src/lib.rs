//! HTTP fixture server for the REST client's integration tests.
//!
//! Plain-http axum router with one route per client behavior under test:
//! a fixed JSON document, a 404 with a diagnostic body, header/query/body
//! echoes, an always-gzipped body, and a latin-1 text body.

use std::io::Write;

use axum::body::Bytes;
use axum::extract::RawQuery;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use tokio::net::TcpListener;

/// Uncompressed payload served (gzipped) by `/gzip`.
pub const GZIP_BODY: &[u8] = b"hello from behind gzip";

/// Latin-1 bytes served by `/text/latin1` ("café").
pub const LATIN1_BODY: &[u8] = &[0x63, 0x61, 0x66, 0xE9];

pub fn app() -> Router {
    Router::new()
        .route("/json", get(fixed_json))
        .route("/missing", get(missing))
        .route("/echo/headers", get(echo_headers).post(echo_headers).put(echo_headers))
        .route("/echo/query", get(echo_query))
        .route("/echo/body", get(echo_body).post(echo_body).put(echo_body))
        .route("/gzip", get(gzip_body))
        .route("/text/latin1", get(latin1_text))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn fixed_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], r#"{"a":1}"#)
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

/// Reflect the request headers back as a JSON object keyed by the
/// lower-cased header name. Repeated headers keep the last value.
async fn echo_headers(headers: HeaderMap) -> Json<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (name, value) in &headers {
        map.insert(
            name.as_str().to_string(),
            json!(value.to_str().unwrap_or("")),
        );
    }
    Json(serde_json::Value::Object(map))
}

async fn echo_query(RawQuery(query): RawQuery) -> Json<serde_json::Value> {
    Json(json!({ "query": query.unwrap_or_default() }))
}

/// Reflect the request body back verbatim under the content type it arrived
/// with.
async fn echo_body(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    ([(header::CONTENT_TYPE, content_type)], body)
}

/// Always serve a gzip-compressed body with `Content-Encoding: gzip`,
/// whether or not the client asked for it.
async fn gzip_body() -> impl IntoResponse {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(GZIP_BODY).expect("gzip write");
    let compressed = encoder.finish().expect("gzip finish");
    ([(header::CONTENT_ENCODING, "gzip")], compressed)
}

async fn latin1_text() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
        LATIN1_BODY.to_vec(),
    )
}

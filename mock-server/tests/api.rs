use std::io::Read;

use axum::http::{header, Request, StatusCode};
use flate2::read::GzDecoder;
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

#[tokio::test]
async fn json_route_serves_fixed_document() {
    let resp = app().oneshot(get("/json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(&body_bytes(resp).await[..], br#"{"a":1}"#);
}

#[tokio::test]
async fn missing_route_is_404_with_body() {
    let resp = app().oneshot(get("/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"not found");
}

#[tokio::test]
async fn header_echo_lowercases_names() {
    let req = Request::builder()
        .uri("/echo/headers")
        .header("X-Custom", "abc")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    let echoed = body_json(resp).await;
    assert_eq!(echoed["x-custom"], "abc");
}

#[tokio::test]
async fn query_echo_returns_raw_query() {
    let resp = app().oneshot(get("/echo/query?a=1&b=x%20y")).await.unwrap();
    let echoed = body_json(resp).await;
    assert_eq!(echoed["query"], "a=1&b=x%20y");
}

#[tokio::test]
async fn body_echo_keeps_content_type() {
    let req = Request::builder()
        .method("POST")
        .uri("/echo/body")
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"k":true}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(&body_bytes(resp).await[..], br#"{"k":true}"#);
}

#[tokio::test]
async fn gzip_route_compresses_unconditionally() {
    let resp = app().oneshot(get("/gzip")).await.unwrap();
    assert_eq!(resp.headers()[header::CONTENT_ENCODING], "gzip");

    let compressed = body_bytes(resp).await;
    let mut decoded = Vec::new();
    GzDecoder::new(&compressed[..])
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, mock_server::GZIP_BODY);
}

#[tokio::test]
async fn latin1_route_serves_raw_bytes() {
    let resp = app().oneshot(get("/text/latin1")).await.unwrap();
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/plain; charset=iso-8859-1"
    );
    assert_eq!(&body_bytes(resp).await[..], mock_server::LATIN1_BODY);
}

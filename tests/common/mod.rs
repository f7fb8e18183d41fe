#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use property_manager_api::store::memory::MemoryStore;
use property_manager_api::{router, AppState};

/// Fresh app over an empty in-memory collaborator.
pub fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    router(AppState::new(store.clone(), store.clone(), store), false)
}

/// Same, with the Bearer-token gate enabled on the resource routes.
pub fn test_app_with_auth() -> Router {
    let store = Arc::new(MemoryStore::new());
    router(AppState::new(store.clone(), store.clone(), store), true)
}

pub async fn send(app: &Router, method: &str, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("request");
    dispatch(app, request).await
}

pub async fn send_json(app: &Router, method: &str, path: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    dispatch(app, request).await
}

pub async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    read_json(dispatch_raw(app, request).await).await
}

pub async fn dispatch_raw(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

/// Hand-rolled multipart body so upload handlers see a real form payload.
pub fn multipart_request(
    path: &str,
    file_field: &str,
    file_name: &str,
    content_type: &str,
    content: &[u8],
    fields: &[(&str, &str)],
) -> Request<Body> {
    let boundary = "x-test-boundary-4f9a21";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{file_field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

/// Create a property and return its generated id.
pub async fn create_property(app: &Router, name: &str) -> String {
    let (status, created) = send_json(
        app,
        "POST",
        "/api/properties",
        &json!({
            "name": name,
            "address": "12 Harbor Way",
            "property_type": "apartment",
            "status": "available",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "property create failed: {}", created);
    created["id"].as_str().expect("generated id").to_string()
}

/// Create a contract and return the full response.
pub async fn create_contract(
    app: &Router,
    property_id: &str,
    status: &str,
    end_date: &str,
    monthly_rent: f64,
) -> (StatusCode, Value) {
    send_json(
        app,
        "POST",
        "/api/contracts",
        &json!({
            "property_id": property_id,
            "tenant_name": "Ana Torres",
            "start_date": "2025-01-01",
            "end_date": end_date,
            "monthly_rent": monthly_rent,
            "status": status,
        }),
    )
    .await
}

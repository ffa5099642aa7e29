//! Bridge endpoint tests
//!
//! Drives the router directly with in-memory requests: the poll/push
//! round-trip, the tolerance contract for malformed markup, the screenshot
//! rendezvous, and the command seam.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use kerfboard_core::CanvasState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn bridge() -> (Arc<CanvasState>, Router) {
    let state = Arc::new(CanvasState::new());
    let app = kerfboard_server::router(Arc::clone(&state));
    (state, app)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn read_state_reports_fresh_canvas() {
    let (_state, app) = bridge();

    let response = app.oneshot(get("/api/svg")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["version"], 0);
    assert_eq!(body["width"], 800);
    assert_eq!(body["height"], 600);
    assert_eq!(body["elements"], json!([]));
    assert_eq!(body["layers"].as_array().unwrap().len(), 4);
    assert_eq!(body["screenshot_requested"], false);
}

#[tokio::test]
async fn push_svg_replaces_document() {
    let (state, app) = bridge();
    state.document().add_element("circle", Default::default(), "");

    let push = json!({ "svg": r#"<svg width="300" height="200"><rect id="el-5" x="1"/></svg>"# });
    let response = app.oneshot(post_json("/api/svg", push)).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], 2);

    let doc = state.document();
    assert_eq!(doc.element_count(), 1);
    assert!(doc.get_element("el-5").is_some());
    assert_eq!((doc.width(), doc.height()), (300, 200));
}

#[tokio::test]
async fn push_svg_tolerates_malformed_markup() {
    let (state, app) = bridge();
    state.document().add_element("rect", Default::default(), "");

    let response = app
        .oneshot(post_json("/api/svg", json!({ "svg": "<not valid xml" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({ "version": 1, "status": "ok" }));
    assert_eq!(state.document().element_count(), 1);
}

#[tokio::test]
async fn push_svg_with_empty_body_acknowledges() {
    let (state, app) = bridge();

    let response = app.oneshot(post_json("/api/svg", json!({}))).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body, json!({ "version": 0, "status": "ok" }));
    assert!(state.document().is_empty());
}

#[tokio::test]
async fn push_screenshot_fulfills_pending_request() {
    let (state, app) = bridge();

    let waiter = {
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            state
                .screenshot()
                .request(std::time::Duration::from_secs(2))
        })
    };
    while !state.screenshot().is_requested() {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app
        .oneshot(post_json("/api/screenshot", json!({ "image": "iVBORw0KGgo=" })))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let data = waiter.await.unwrap();
    assert_eq!(data.as_deref(), Some("iVBORw0KGgo="));
}

#[tokio::test]
async fn push_screenshot_ignores_empty_payload() {
    let (state, app) = bridge();

    let response = app
        .oneshot(post_json("/api/screenshot", json!({ "image": "" })))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    assert!(!state.screenshot().is_requested());
}

#[tokio::test]
async fn command_endpoint_runs_edits() {
    let (state, app) = bridge();

    let command = json!({
        "op": "add_element",
        "tag": "rect",
        "attrs": r#"{"x":"10","y":"10","width":"50","height":"30"}"#,
        "layer": "ENGRAVE",
    });
    let response = app.oneshot(post_json("/api/command", command)).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["id"], "el-1");
    assert_eq!(body["layer"], "ENGRAVE");
    assert_eq!(state.document().version(), 1);
}

#[tokio::test]
async fn command_endpoint_reports_errors_as_payload() {
    let (_state, app) = bridge();

    let command = json!({ "op": "remove_element", "element_id": "el-9" });
    let response = app.oneshot(post_json("/api/command", command)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Element 'el-9' not found" }));
}

#[tokio::test]
async fn bridge_allows_cross_origin_requests() {
    let (_state, app) = bridge();

    let request = Request::builder()
        .uri("/api/svg")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

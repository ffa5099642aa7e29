//! Kerfboard HTTP Bridge
//!
//! Serves the polling protocol between the shared canvas and the browser,
//! plus a JSON command endpoint for tool hosts.
//!
//! ## Protocol
//!
//! The browser polls and pushes JSON:
//! ```json
//! GET  /api/svg        -> { "version": 3, "width": 800, "elements": [...], ... }
//! POST /api/svg        <- { "svg": "<svg ...>" }
//! POST /api/screenshot <- { "image": "<base64 png>" }
//! ```
//!
//! Command clients post tagged operations:
//! ```json
//! POST /api/command    <- { "op": "add_element", "tag": "rect", "attrs": "{...}" }
//! ```

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use kerfboard_core::{CanvasState, Command, StateSnapshot, dispatch};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

/// Body of a bulk markup push from the browser.
#[derive(Debug, Deserialize)]
pub struct SvgPush {
    #[serde(default)]
    svg: String,
}

/// Body of a captured screenshot push from the browser.
#[derive(Debug, Deserialize)]
pub struct ScreenshotPush {
    #[serde(default)]
    image: String,
}

/// Build the bridge router. CORS is wide open: the browser client is
/// served from anywhere.
pub fn router(state: Arc<CanvasState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/svg", get(read_state).post(push_svg))
        .route("/api/screenshot", post(push_screenshot))
        .route("/api/command", post(run_command))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "Kerfboard bridge - poll GET /api/svg, push POST /api/svg and /api/screenshot"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Browser polls this for the current canvas state.
async fn read_state(State(state): State<Arc<CanvasState>>) -> Json<StateSnapshot> {
    Json(state.snapshot())
}

/// Browser pushes its live DOM state. Unparseable markup is tolerated:
/// the push is acknowledged either way with whatever version resulted.
async fn push_svg(State(state): State<Arc<CanvasState>>, Json(push): Json<SvgPush>) -> Json<Value> {
    let version = {
        let mut doc = state.document();
        if !push.svg.is_empty() {
            doc.apply_svg(&push.svg);
        }
        doc.version()
    };
    debug!("svg push acknowledged at version {}", version);
    Json(json!({ "version": version, "status": "ok" }))
}

/// Browser posts captured screenshot data, fulfilling a pending request.
async fn push_screenshot(
    State(state): State<Arc<CanvasState>>,
    Json(push): Json<ScreenshotPush>,
) -> Json<Value> {
    if !push.image.is_empty() {
        state.screenshot().fulfill(push.image);
        debug!("screenshot captured");
    }
    Json(json!({ "status": "ok" }))
}

/// Run one edit command. Screenshot waits block, so commands run on the
/// blocking pool rather than a runtime worker.
async fn run_command(
    State(state): State<Arc<CanvasState>>,
    Json(command): Json<Command>,
) -> Json<Value> {
    let result = tokio::task::spawn_blocking(move || dispatch(&state, command)).await;
    Json(result.unwrap_or_else(|err| {
        warn!("command task failed: {}", err);
        json!({ "error": "command execution failed" })
    }))
}

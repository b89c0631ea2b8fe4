//! Streamable HTTP transport.
//!
//! Stateless: every `POST /mcp` carries one JSON-RPC message and gets a JSON
//! answer in the same response. Notifications are acknowledged with
//! `202 Accepted` and an empty body.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::McpHandler;

/// Create the HTTP router for MCP.
pub fn create_router(handler: Arc<McpHandler>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(handle_mcp_post))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(handler)
}

async fn health_check(State(handler): State<Arc<McpHandler>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "tools": handler.tools().len()
    }))
}

/// Handle POST requests to /mcp.
///
/// The body is taken raw so that malformed JSON becomes a JSON-RPC parse
/// error instead of axum's plain-text rejection.
async fn handle_mcp_post(State(handler): State<Arc<McpHandler>>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(&body);

    match handler.handle_message(&raw).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

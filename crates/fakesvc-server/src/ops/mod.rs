//! Operational HTTP endpoints.
//!
//! - `/`        : capability listing
//! - `/health`  : liveness with a UNIX timestamp
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::store::now_epoch_secs;

pub const SERVICE_NAME: &str = "Fake Service API";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Content type of the text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Resource paths advertised by `GET /`.
pub const ENDPOINTS: [&str; 7] = [
    "/health",
    "/metrics",
    "/users",
    "/users/{user_id}",
    "/orders",
    "/orders/{order_id}",
    "/stats",
];

pub async fn index() -> Json<Value> {
    tracing::info!("root endpoint accessed");
    Json(json!({
        "message": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "endpoints": ENDPOINTS,
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": now_epoch_secs() }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

//! Request instrumentation middleware.
//!
//! Wraps the whole router. Handler errors are already responses by the time
//! they reach here, so every request is counted exactly once and timed,
//! whatever its status. The response passes through untouched.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub async fn track_http(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let res = next.run(req).await;

    let elapsed = started.elapsed();
    let status = res.status().as_u16();
    state.metrics().http_request(&method, &path, status, elapsed);
    tracing::debug!(%method, %path, status, elapsed_ms = elapsed.as_millis() as u64, "request");

    res
}

//! Axum router wiring.
//!
//! Every route, including the fallback 404, sits under the request
//! instrumentation layer.

use axum::{middleware, routing::get, Router};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::index))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route("/users/:user_id", get(api::users::get_user))
        .route("/orders", get(api::orders::list_orders).post(api::orders::create_order))
        .route("/orders/:order_id", get(api::orders::get_order))
        .route("/stats", get(api::stats::stats))
        .layer(middleware::from_fn_with_state(state.clone(), obs::http::track_http))
        .with_state(state)
}

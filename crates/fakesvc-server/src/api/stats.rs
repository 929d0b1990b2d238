//! Aggregate service statistics.

use axum::extract::{Json, State};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::sim::LatencyRange;

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Json<Value> {
    state.sim().db_query("ANALYTICS", LatencyRange::ANALYTICS).await;

    let total_users = state.store().user_count().await;
    let total_orders = state.store().order_count().await;

    Json(json!({
        "total_users": total_users,
        "total_orders": total_orders,
        "active_users": state.sim().sample_active_users(),
        "cache_size": state.cache().len(),
        "uptime_seconds": state.uptime().as_secs_f64(),
    }))
}

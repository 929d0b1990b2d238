//! Order endpoints: list with pricing lookup, paid create, lookup by id.

use axum::extract::{Json, Path, Query, State};
use serde_json::{json, Value};

use fakesvc_core::error::FakeSvcError;
use fakesvc_core::model::{NewOrder, Order};

use crate::api::{creation_params, ApiResult, PAYMENT_GATEWAY, PRICING_SERVICE};
use crate::app_state::AppState;
use crate::sim::LatencyRange;

/// `GET /orders`
pub async fn list_orders(State(state): State<AppState>) -> Json<Value> {
    state
        .sim()
        .db_query("SELECT_WITH_JOIN", LatencyRange::SELECT_WITH_JOIN)
        .await;

    // Pricing lookup is decorative: the listing goes out either way.
    let p = state.success_rates().pricing_service;
    state.sim().attempt(PRICING_SERVICE, p).await;

    let orders = state.store().orders().await;
    Json(json!({ "orders": &*orders, "count": orders.len() }))
}

/// `POST /orders`
pub async fn create_order(
    State(state): State<AppState>,
    query: Option<Query<NewOrder>>,
    body: Option<Json<NewOrder>>,
) -> ApiResult<Json<Order>> {
    let new = creation_params(query, body, "user_id, product and amount are missing or invalid")?;

    // User lookup is simulated only; `user_id` is never checked.
    state.sim().db_query("SELECT", LatencyRange::SELECT_BY_ID).await;

    let p = state.success_rates().payment_gateway;
    if !state.sim().attempt(PAYMENT_GATEWAY, p).await {
        return Err(FakeSvcError::DependencyUnavailable("Payment gateway unavailable".into()).into());
    }

    state.sim().db_query("INSERT", LatencyRange::INSERT_ORDER).await;

    let order = state.store().insert_order(new).await;
    tracing::info!(id = order.id, user_id = order.user_id, product = %order.product, amount = order.amount, "order created");

    Ok(Json(order))
}

/// `GET /orders/{order_id}`
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> ApiResult<Json<Order>> {
    state.sim().db_query("SELECT", LatencyRange::SELECT).await;

    let order = state
        .store()
        .find_order(order_id)
        .await
        .ok_or_else(|| FakeSvcError::NotFound("Order not found".into()))?;

    Ok(Json(order))
}

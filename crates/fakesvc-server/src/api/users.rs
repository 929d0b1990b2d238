//! User endpoints: cached list, validated create, cached lookup by id.

use axum::extract::{Json, Path, Query, State};
use serde_json::{json, Value};

use fakesvc_core::error::FakeSvcError;
use fakesvc_core::model::{NewUser, User};

use crate::api::{creation_params, ApiError, ApiResult, EMAIL_VALIDATION_SERVICE};
use crate::app_state::AppState;
use crate::cache::{user_key, ALL_USERS_KEY};
use crate::sim::LatencyRange;
use crate::store::EntityStore;

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> Json<Value> {
    if let Some(hit) = state.cache().get("users", ALL_USERS_KEY) {
        return Json(hit);
    }

    state.sim().db_query("SELECT", LatencyRange::SELECT).await;
    state.metrics().set_active_users(state.sim().sample_active_users());

    // Snapshot and cache under the users guard so a concurrent create cannot
    // slip in between and leave a stale list cached.
    let users = state.store().users().await;
    let body = json!({ "users": &*users, "count": users.len() });
    state.cache().put(ALL_USERS_KEY, body.clone());

    Json(body)
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    query: Option<Query<NewUser>>,
    body: Option<Json<NewUser>>,
) -> ApiResult<Json<User>> {
    let new = creation_params(query, body, "name and email are missing or invalid")?;

    let p = state.success_rates().email_validation;
    if !state.sim().attempt(EMAIL_VALIDATION_SERVICE, p).await {
        return Err(FakeSvcError::Validation("Email validation failed".into()).into());
    }

    state.sim().db_query("INSERT", LatencyRange::INSERT_USER).await;

    let user = {
        let mut users = state.store().users().await;
        let user = EntityStore::insert_user(&mut users, new);
        // Only the list key; `user_{id}` entries are left alone.
        state.cache().invalidate(ALL_USERS_KEY);
        user
    };

    state.metrics().inc_active_users();
    tracing::info!(id = user.id, name = %user.name, email = %user.email, "user created");

    Ok(Json(user))
}

/// `GET /users/{user_id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let key = user_key(user_id);
    if let Some(hit) = state.cache().get("user", &key) {
        return Ok(Json(hit));
    }

    state.sim().db_query("SELECT", LatencyRange::SELECT_BY_ID).await;

    let user = state
        .store()
        .find_user(user_id)
        .await
        .ok_or_else(|| FakeSvcError::NotFound("User not found".into()))?;

    let value = serde_json::to_value(&user)
        .map_err(|e| ApiError(FakeSvcError::Internal(format!("encode user failed: {e}"))))?;
    state.cache().put(key, value.clone());

    Ok(Json(value))
}

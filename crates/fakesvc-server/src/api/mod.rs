//! Resource endpoints (users, orders, stats).
//!
//! Handlers compose the simulator, cache and store. Failures are returned as
//! `ApiError`, which renders `{"detail": ...}` with the status mapped from the
//! error's `ClientCode`.

pub mod orders;
pub mod stats;
pub mod users;

use axum::{
    extract::{Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use fakesvc_core::error::FakeSvcError;

/// Simulated dependency names, as they appear in `external_api_calls_total`.
pub const EMAIL_VALIDATION_SERVICE: &str = "email_validation_service";
pub const PAYMENT_GATEWAY: &str = "payment_gateway";
pub const PRICING_SERVICE: &str = "pricing_service";

#[derive(Debug)]
pub struct ApiError(pub FakeSvcError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<FakeSvcError> for ApiError {
    fn from(e: FakeSvcError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = %self.0, code = code.as_str(), "request failed");
        }
        (status, Json(json!({ "detail": self.0.detail() }))).into_response()
    }
}

/// Creation parameters may come as a JSON body or as query parameters; the
/// body wins when both are present.
pub(crate) fn creation_params<T>(
    query: Option<Query<T>>,
    body: Option<Json<T>>,
    missing: &str,
) -> ApiResult<T> {
    body.map(|Json(b)| b)
        .or_else(|| query.map(|Query(q)| q))
        .ok_or_else(|| ApiError(FakeSvcError::InvalidRequest(missing.to_string())))
}

//! Shared error type across fakesvc crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// A simulated validation dependency rejected the input.
    ValidationFailed,
    /// A simulated downstream dependency is unavailable.
    DependencyUnavailable,
    /// Requested entity does not exist.
    NotFound,
    /// Request is missing required fields.
    InvalidRequest,
    /// Metric or config shape mismatch.
    Configuration,
    /// Metric name was never registered.
    UnknownMetric,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::ValidationFailed => "VALIDATION_FAILED",
            ClientCode::DependencyUnavailable => "DEPENDENCY_UNAVAILABLE",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::InvalidRequest => "INVALID_REQUEST",
            ClientCode::Configuration => "CONFIGURATION",
            ClientCode::UnknownMetric => "UNKNOWN_METRIC",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code this error surfaces as.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::ValidationFailed => 400,
            ClientCode::NotFound => 404,
            ClientCode::InvalidRequest => 422,
            ClientCode::DependencyUnavailable => 503,
            ClientCode::Configuration | ClientCode::UnknownMetric | ClientCode::Internal => 500,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FakeSvcError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum FakeSvcError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration: {0}")]
    Configuration(String),
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FakeSvcError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            FakeSvcError::Validation(_) => ClientCode::ValidationFailed,
            FakeSvcError::DependencyUnavailable(_) => ClientCode::DependencyUnavailable,
            FakeSvcError::NotFound(_) => ClientCode::NotFound,
            FakeSvcError::InvalidRequest(_) => ClientCode::InvalidRequest,
            FakeSvcError::Configuration(_) => ClientCode::Configuration,
            FakeSvcError::UnknownMetric(_) => ClientCode::UnknownMetric,
            FakeSvcError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Human-readable detail without the variant prefix.
    ///
    /// This is what HTTP responses carry in their `detail` field.
    pub fn detail(&self) -> &str {
        match self {
            FakeSvcError::Validation(d)
            | FakeSvcError::DependencyUnavailable(d)
            | FakeSvcError::NotFound(d)
            | FakeSvcError::InvalidRequest(d)
            | FakeSvcError::Configuration(d)
            | FakeSvcError::UnknownMetric(d)
            | FakeSvcError::Internal(d) => d,
        }
    }
}

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coupon_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{ code, msg, data }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `coupon_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A request body, query string or path segment that could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request outlived `REQUEST_TIMEOUT_SECS`.
    #[error("Request timed out")]
    Timeout,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Application error codes carried in the envelope's `code` field.
pub mod codes {
    pub const BAD_REQUEST: u32 = 40000;
    pub const INVALID_TYPE: u32 = 40001;
    pub const UNAUTHORIZED: u32 = 40100;
    pub const FORBIDDEN: u32 = 40300;
    pub const NOT_FOUND: u32 = 40400;
    pub const REQUEST_TIMEOUT: u32 = 40800;
    pub const CONFLICT: u32 = 40900;
    pub const DUPLICATE_CODE: u32 = 40901;
    pub const ALREADY_CLAIMED: u32 = 40902;
    pub const OUT_OF_STOCK: u32 = 40903;
    pub const COUPON_LOCKED: u32 = 40904;
    pub const RATE_LIMITED: u32 = 42900;
    pub const INTERNAL: u32 = 50000;
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, data) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    codes::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                    Value::Null,
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    codes::BAD_REQUEST,
                    msg.clone(),
                    Value::Null,
                ),
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, codes::CONFLICT, msg.clone(), Value::Null)
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    codes::UNAUTHORIZED,
                    msg.clone(),
                    Value::Null,
                ),
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, codes::FORBIDDEN, msg.clone(), Value::Null)
                }
                CoreError::InvalidCouponType(_) => (
                    StatusCode::BAD_REQUEST,
                    codes::INVALID_TYPE,
                    core.to_string(),
                    Value::Null,
                ),
                CoreError::DuplicateCode(_) => (
                    StatusCode::CONFLICT,
                    codes::DUPLICATE_CODE,
                    core.to_string(),
                    Value::Null,
                ),
                CoreError::AlreadyClaimed(_) => (
                    StatusCode::CONFLICT,
                    codes::ALREADY_CLAIMED,
                    core.to_string(),
                    Value::Null,
                ),
                CoreError::OutOfStock(_) => (
                    StatusCode::CONFLICT,
                    codes::OUT_OF_STOCK,
                    core.to_string(),
                    Value::Null,
                ),
                CoreError::CouponLocked(_) => (
                    StatusCode::CONFLICT,
                    codes::COUPON_LOCKED,
                    core.to_string(),
                    Value::Null,
                ),
                CoreError::RateLimited {
                    remaining_hours,
                    remaining_minutes,
                } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    codes::RATE_LIMITED,
                    core.to_string(),
                    json!({
                        "remaining_hours": remaining_hours,
                        "remaining_minutes": remaining_minutes,
                    }),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        codes::INTERNAL,
                        INTERNAL_MESSAGE.to_string(),
                        Value::Null,
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                (status, code, message, Value::Null)
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                codes::BAD_REQUEST,
                msg.clone(),
                Value::Null,
            ),
            AppError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                codes::BAD_REQUEST,
                msg.clone(),
                Value::Null,
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                codes::REQUEST_TIMEOUT,
                self.to_string(),
                Value::Null,
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    codes::INTERNAL,
                    INTERNAL_MESSAGE.to_string(),
                    Value::Null,
                )
            }
        };

        let body = json!({
            "code": code,
            "msg": message,
            "data": data,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Everything else (including pool timeouts) maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, u32, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => (
            StatusCode::CONFLICT,
            codes::CONFLICT,
            "Duplicate value violates a unique constraint".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    /// State machine violated — the record is already terminal, or the
    /// transition lost an optimistic-guard race to a concurrent resolver.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Duplicate appeal: {0}")]
    DuplicateAppeal(String),

    #[error("Duplicate prediction: {0}")]
    DuplicatePrediction(String),

    #[error("Already scored: {0}")]
    AlreadyScored(String),

    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            AppError::DuplicateAppeal(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_APPEAL", msg.clone())
            }
            AppError::DuplicatePrediction(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_PREDICTION", msg.clone())
            }
            AppError::AlreadyScored(msg) => (StatusCode::CONFLICT, "ALREADY_SCORED", msg.clone()),
            AppError::InvalidOutcome(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_OUTCOME",
                msg.clone(),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

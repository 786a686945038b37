use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Store(e) => store_error_parts(e),
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

fn store_error_parts(e: &StoreError) -> (StatusCode, &'static str, String) {
    match e {
        StoreError::IndexOutOfRange { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
        StoreError::SchemaMismatch { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "SCHEMA_MISMATCH",
            e.to_string(),
        ),
        StoreError::UnknownField(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "UNKNOWN_FIELD",
            e.to_string(),
        ),
        StoreError::InvalidValue { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_VALUE",
            e.to_string(),
        ),
        // Surfaced verbatim: the user has to repair the file by hand.
        StoreError::MalformedStore { .. } => {
            tracing::error!("{e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MALFORMED_STORE",
                e.to_string(),
            )
        }
        StoreError::SchemaNotEstablished | StoreError::Io { .. } => {
            tracing::error!("Store error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "A storage error occurred".to_string(),
            )
        }
    }
}

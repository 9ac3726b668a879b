use crate::models::DirectionsValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Mapbox API error: {0}")]
    MapboxApi(String),

    #[error("Draft store error: {0}")]
    DraftStore(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Directions could not be converted: {0}")]
    DirectionsValidation(#[from] DirectionsValidationError),

    #[error("Not found: {0}")]
    NotFound(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut detail = None;
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal database error")
            }
            AppError::MapboxApi(ref e) => {
                tracing::error!("Mapbox API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error")
            }
            AppError::DraftStore(ref e) => {
                tracing::warn!("Draft store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Draft store error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::DirectionsValidation(ref e) => {
                tracing::warn!(path = %e.path(), "Directions response rejected: {}", e);
                detail = Some(e.to_string());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The directions for this tour could not be loaded. Please generate the tour again.",
                )
            }
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.as_str()),
        };

        let mut body = json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        });
        if let Some(detail) = detail {
            body["detail"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

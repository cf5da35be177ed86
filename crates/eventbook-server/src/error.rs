// ABOUTME: ApiError maps catalog failures onto HTTP status codes and JSON bodies.
// ABOUTME: Validation errors report per-field messages; storage errors are logged and hidden.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eventbook_core::{CatalogError, NOT_FOUND_MESSAGE, StoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("event {0} not found")]
    NotFound(i64),

    /// The request body could not be decoded at all.
    #[error("malformed request body: {0}")]
    BadBody(String),

    /// The query string could not be decoded.
    #[error("malformed query string: {0}")]
    BadQuery(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(e) => Self::Validation(e),
            CatalogError::NotFound(id) => Self::NotFound(id),
            CatalogError::Store(e) => Self::Store(e),
        }
    }
}

fn field_message(field: &str, message: impl Into<String>) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    fields.insert(field.to_string(), serde_json::Value::String(message.into()));
    serde_json::json!({ "message": fields })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => {
                tracing::warn!(field = e.field, "rejected request: {}", e.message);
                (StatusCode::BAD_REQUEST, Json(field_message(e.field, e.message))).into_response()
            }
            Self::NotFound(id) => {
                tracing::debug!(id, "event not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(serde_json::json!({ "message": NOT_FOUND_MESSAGE })),
                )
                    .into_response()
            }
            Self::BadBody(reason) => {
                tracing::warn!("rejected request body: {}", reason);
                (StatusCode::BAD_REQUEST, Json(field_message("body", reason))).into_response()
            }
            Self::BadQuery(reason) => {
                tracing::warn!("rejected query string: {}", reason);
                (StatusCode::BAD_REQUEST, Json(field_message("query", reason))).into_response()
            }
            Self::Store(e) => {
                tracing::error!("storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "message": "internal storage error" })),
                )
                    .into_response()
            }
        }
    }
}

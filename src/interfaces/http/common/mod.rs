//! Response envelope and error mapping shared by all handlers

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::shared::errors::{CatalogError, EditorError};

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Standard API response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty payload for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

pub fn session_not_found(id: uuid::Uuid) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("Editor session {} not found", id))
}

/// Unknown tier rows are 404; every other editor error is a rejected input
pub fn editor_error(err: EditorError) -> ApiError {
    if err.is_invariant_violation() {
        error!(error = %err, "Editor invariant violated");
        return api_error(StatusCode::NOT_FOUND, err.to_string());
    }
    api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

pub fn catalog_error(err: CatalogError) -> ApiError {
    error!(error = %err, "Metric catalog unavailable");
    api_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn editor_errors_map_to_statuses() {
        let (status, Json(body)) = editor_error(EditorError::MissingRangeEnd);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.as_deref(), Some("Please enter a non-infinite range end"));
        assert!(!body.success);

        let (status, _) = editor_error(EditorError::TierNotFound(Decimal::TEN));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_envelope_omits_error_on_success() {
        let json = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 1}));
    }
}

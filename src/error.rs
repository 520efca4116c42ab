//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Missing or wrong `x-api-key` header
    InvalidApiKey,

    /// Client-side input problem (extension, missing field, overlong clip)
    InvalidInput(String),

    /// Decode or analysis failure; the cause is logged, never exposed
    Processing(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, "Invalid API Key".to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Processing(msg) => {
                tracing::error!("Audio processing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Audio processing failed.".to_string(),
                )
            }
        };

        let body = Json(json!({ "detail": detail }));

        (status, body).into_response()
    }
}

impl From<crate::audio::DecodeError> for AppError {
    fn from(err: crate::audio::DecodeError) -> Self {
        AppError::Processing(err.to_string())
    }
}

//! API-key middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppError, AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Require the shared secret in `x-api-key`.
///
/// Checked before any request body is touched; mismatch and absence are
/// indistinguishable to the client. Only the generic 401 message is ever
/// surfaced, nothing about the attempt is logged beyond the trace layer.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == state.config.api_key => Ok(next.run(req).await),
        _ => Err(AppError::InvalidApiKey),
    }
}

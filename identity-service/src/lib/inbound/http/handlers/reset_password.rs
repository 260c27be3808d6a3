use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Complete a password reset with a token from the delivery channel.
/// Expired, forged, replayed-after-deactivation, and plain garbage tokens
/// all surface as the same bad-token answer.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .identity_service
        .confirm_password_reset(&body.token, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    password: String,
}

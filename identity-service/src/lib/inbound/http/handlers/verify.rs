use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Complete email verification with a token from the delivery channel.
/// Replays against an already-verified account are the one distinguishable
/// failure; everything else collapses to bad-token.
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .identity_service
        .confirm_verification(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyRequest {
    token: String,
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::LoginId;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Request an email-verification token. 202 for every input, including
/// unknown, inactive, and already-verified accounts; whether a token was
/// actually issued is not observable here.
pub async fn request_verification(
    State(state): State<AppState>,
    Json(body): Json<RequestVerificationRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let accepted = ApiSuccess::new(StatusCode::ACCEPTED, ());

    let Ok(login) = LoginId::new(body.login) else {
        return Ok(accepted);
    };

    state
        .identity_service
        .request_verification(&login)
        .await
        .map_err(ApiError::from)?;

    Ok(accepted)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestVerificationRequest {
    login: String,
}

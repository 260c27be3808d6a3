use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::LoginId;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Start a password reset. Answers 202 regardless of whether the account
/// exists, is active, or the login even parses; the response is useless as
/// an account-enumeration oracle.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let accepted = ApiSuccess::new(StatusCode::ACCEPTED, ());

    let Ok(login) = LoginId::new(body.login) else {
        return Ok(accepted);
    };

    state
        .identity_service
        .request_password_reset(&login)
        .await
        .map_err(ApiError::from)?;

    Ok(accepted)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    login: String,
}

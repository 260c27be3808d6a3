use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::LoginId;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Bearer backend login: verify the credential pair, answer with a session
/// token the client replays in the `Authorization` header.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    // A login that does not even parse gets the same answer as a wrong
    // password; the failure shape never identifies which check tripped.
    let login = LoginId::new(body.login)
        .map_err(|_| ApiError::BadRequest("Invalid credentials".to_string()))?;

    let user = state
        .identity_service
        .authenticate(&login, &body.password)
        .await
        .map_err(ApiError::from)?;

    let access_token = state
        .authenticator
        .issue_session(&user)
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenData {
            access_token,
            token_type: "bearer".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub token_type: String,
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::LoginId;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::LoginError;

/// The caller's own record, as resolved by the authentication gate.
pub async fn get_me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, UserData::from(&user)))
}

/// Self-service profile update; absent fields are left untouched.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .identity_service
        .update_profile(&user.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref updated| ApiSuccess::new(StatusCode::OK, updated.into()))
}

/// HTTP request body for a partial profile update (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    login: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum ParseUpdateProfileRequestError {
    #[error("Invalid login: {0}")]
    Login(#[from] LoginError),
}

impl UpdateProfileRequest {
    pub fn try_into_command(
        self,
    ) -> Result<UpdateProfileCommand, ParseUpdateProfileRequestError> {
        let login = self.login.map(LoginId::new).transpose()?;
        Ok(UpdateProfileCommand {
            login,
            password: self.password,
        })
    }
}

impl From<ParseUpdateProfileRequestError> for ApiError {
    fn from(err: ParseUpdateProfileRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use super::login::LoginRequest;
use super::ApiError;
use crate::config::AuthConfig;
use crate::domain::user::models::LoginId;
use crate::domain::user::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Cookie backend login: same verification as the bearer backend, but the
/// session token travels back inside an HttpOnly cookie and the body stays
/// empty.
pub async fn cookie_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let login = LoginId::new(body.login)
        .map_err(|_| ApiError::BadRequest("Invalid credentials".to_string()))?;

    let user = state
        .identity_service
        .authenticate(&login, &body.password)
        .await
        .map_err(ApiError::from)?;

    let token = state
        .authenticator
        .issue_session(&user)
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    let cookie = session_cookie(
        &state.auth_config,
        &token,
        state.auth_config.session_lifetime_seconds,
    );

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

/// Build the session cookie string. `max_age` of zero expires it, which is
/// how logout clears the browser's copy.
pub fn session_cookie(config: &AuthConfig, value: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, value, max_age
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

use super::cookie_login::session_cookie;
use crate::inbound::http::router::AppState;

/// Cookie backend logout. Tokens are stateless, so there is nothing to
/// revoke server-side; the only state to clear is the browser's cookie.
/// The route sits behind the authentication gate, so an anonymous caller
/// gets a 401 instead of a silent success.
pub async fn logout(State(state): State<AppState>) -> Response {
    let expired = session_cookie(&state.auth_config, "", 0);
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired)]).into_response()
}

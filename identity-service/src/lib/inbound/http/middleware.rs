use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Credential;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

/// Extension type carrying the resolved user through request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Gate for the self-service routes. Resolves the inbound credential and,
/// depending on configuration, requires the account to be merely active or
/// also verified. The resolved user rides in request extensions so handlers
/// never re-run the lookup.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let credential = extract_credential(&state, &req)?;

    let user = if state.auth_config.require_verification {
        state.authenticator.current_verified_user(&credential).await
    } else {
        state.authenticator.current_active_user(&credential).await
    }
    .map_err(auth_error_response)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Gate requiring only an active account, independent of the
/// verification setting. Logout lives behind this one: an unverified user
/// can always end their own session.
pub async fn authenticate_active(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let credential = extract_credential(&state, &req)?;

    let user = state
        .authenticator
        .current_active_user(&credential)
        .await
        .map_err(auth_error_response)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Gate for the admin routes: authenticated, active, and superuser.
pub async fn authenticate_superuser(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let credential = extract_credential(&state, &req)?;

    let user = state
        .authenticator
        .current_superuser(&credential)
        .await
        .map_err(auth_error_response)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Pick the inbound credential: the `Authorization` header wins when both
/// backends are present, the session cookie is the fallback.
fn extract_credential(state: &AppState, req: &Request) -> Result<Credential, Response> {
    if let Some(auth_header) = req.headers().get(http::header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| {
            unauthorized("Invalid Authorization header")
        })?;

        if !auth_str.starts_with("Bearer ") {
            return Err(unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>",
            ));
        }

        return Ok(Credential::bearer(auth_str.trim_start_matches("Bearer ")));
    }

    if let Some(token) = extract_session_cookie(state, req) {
        return Ok(Credential::cookie(token));
    }

    Err(unauthorized("Missing credentials"))
}

fn extract_session_cookie(state: &AppState, req: &Request) -> Option<String> {
    let header = req.headers().get(http::header::COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == state.auth_config.cookie_name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn auth_error_response(err: AuthError) -> Response {
    match err {
        AuthError::Unauthenticated => unauthorized("Invalid or missing credentials"),
        // Deactivation revokes access the same way a bad token does.
        AuthError::Inactive => unauthorized("Inactive user"),
        AuthError::Unverified => forbidden("Unverified user"),
        AuthError::NotSuperuser => forbidden("Forbidden"),
        AuthError::Store(reason) => {
            tracing::error!("Credential resolution failed: {}", reason);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response()
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

fn forbidden(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

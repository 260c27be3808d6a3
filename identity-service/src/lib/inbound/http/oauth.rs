//! Optional OAuth2 authorization-code passthrough.
//!
//! Compiled in behind the `oauth` cargo feature and mounted only when the
//! `[oauth]` configuration section is present. The flow is a plain
//! passthrough: redirect the browser to the provider, then exchange the
//! returned code for the provider's token. Nothing here touches the user
//! store.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::http::{self};
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum::routing::get;
use axum::Json;
use axum::Router;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::AuthUrl;
use oauth2::AuthorizationCode;
use oauth2::ClientId;
use oauth2::ClientSecret;
use oauth2::CsrfToken;
use oauth2::RedirectUrl;
use oauth2::Scope;
use oauth2::TokenResponse;
use oauth2::TokenUrl;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::config::OAuthConfig;

const STATE_COOKIE: &str = "oauth_state";

struct OAuthState {
    client: BasicClient,
    scopes: Vec<String>,
}

/// Build the OAuth routes from a validated provider configuration.
///
/// # Errors
/// Fails when any of the configured provider URLs does not parse.
pub fn router(config: &OAuthConfig) -> Result<Router, anyhow::Error> {
    let client = BasicClient::new(
        ClientId::new(config.client_id.clone()),
        Some(ClientSecret::new(config.client_secret.clone())),
        AuthUrl::new(config.auth_url.clone()).context("Invalid OAuth auth_url")?,
        Some(TokenUrl::new(config.token_url.clone()).context("Invalid OAuth token_url")?),
    )
    .set_redirect_uri(
        RedirectUrl::new(config.redirect_url.clone()).context("Invalid OAuth redirect_url")?,
    );

    let state = Arc::new(OAuthState {
        client,
        scopes: config.scopes.clone(),
    });

    Ok(Router::new()
        .route("/api/auth/oauth/authorize", get(authorize))
        .route("/api/auth/oauth/callback", get(callback))
        .with_state(state))
}

/// Start the flow: send the browser to the provider with a fresh CSRF
/// state, and pin that state in a short-lived HttpOnly cookie.
async fn authorize(State(state): State<Arc<OAuthState>>) -> Response {
    let mut request = state.client.authorize_url(CsrfToken::new_random);
    for scope in &state.scopes {
        request = request.add_scope(Scope::new(scope.clone()));
    }
    let (auth_url, csrf_token) = request.url();

    let state_cookie = format!(
        "{}={}; Path=/api/auth/oauth; HttpOnly; SameSite=Lax; Max-Age=600",
        STATE_COOKIE,
        csrf_token.secret()
    );

    (
        [(header::SET_COOKIE, state_cookie)],
        Redirect::temporary(auth_url.as_str()),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: String,
    state: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct OAuthTokenData {
    access_token: String,
    token_type: String,
}

/// Finish the flow: check the CSRF state against the pinned cookie, then
/// exchange the authorization code for the provider's token.
async fn callback(
    State(state): State<Arc<OAuthState>>,
    Query(params): Query<CallbackParams>,
    req: Request,
) -> Response {
    let Some(expected) = state_cookie_value(&req) else {
        return bad_request("Missing OAuth state cookie");
    };

    if params.state != expected {
        return bad_request("OAuth state mismatch");
    }

    let token = match state
        .client
        .exchange_code(AuthorizationCode::new(params.code))
        .request_async(async_http_client)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("OAuth code exchange failed: {}", e);
            return bad_request("OAuth code exchange failed");
        }
    };

    (
        StatusCode::OK,
        Json(OAuthTokenData {
            access_token: token.access_token().secret().clone(),
            token_type: "bearer".to_string(),
        }),
    )
        .into_response()
}

fn state_cookie_value(req: &Request) -> Option<String> {
    let header = req.headers().get(http::header::COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == STATE_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

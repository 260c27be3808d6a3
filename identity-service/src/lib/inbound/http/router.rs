use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::cookie_login::cookie_login;
use super::handlers::forgot_password::forgot_password;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::get_me;
use super::handlers::me::update_me;
use super::handlers::register::register;
use super::handlers::request_verification::request_verification;
use super::handlers::reset_password::reset_password;
use super::handlers::users::delete_user;
use super::handlers::users::get_user;
use super::handlers::users::update_user;
use super::handlers::verify::verify;
use super::middleware::authenticate as auth_middleware;
use super::middleware::authenticate_active;
use super::middleware::authenticate_superuser;
use crate::config::AuthConfig;
use crate::domain::auth::service::Authenticator;
use crate::domain::user::service::IdentityService;
use crate::outbound::events::KafkaNotificationPublisher;
use crate::outbound::repositories::user::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub identity_service:
        Arc<IdentityService<PostgresUserRepository, KafkaNotificationPublisher>>,
    pub authenticator: Arc<Authenticator<PostgresUserRepository>>,
    pub auth_config: Arc<AuthConfig>,
}

pub fn create_router(
    identity_service: Arc<IdentityService<PostgresUserRepository, KafkaNotificationPublisher>>,
    authenticator: Arc<Authenticator<PostgresUserRepository>>,
    auth_config: Arc<AuthConfig>,
) -> Router {
    let state = AppState {
        identity_service,
        authenticator,
        auth_config,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/token/login", post(login))
        .route("/api/auth/cookie/login", post(cookie_login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/auth/request-verify-token", post(request_verification))
        .route("/api/auth/verify", post(verify));

    // Logout only needs an active account; the profile routes additionally
    // honor the require_verification setting.
    let logout_routes = Router::new()
        .route("/api/auth/cookie/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_active,
        ));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_me))
        .route("/api/users/me", patch(update_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/:user_id", patch(update_user))
        .route("/api/users/:user_id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_superuser,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(logout_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

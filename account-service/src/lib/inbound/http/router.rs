use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::profile::profile;
use super::handlers::register::register;
use super::handlers::reset_password::request_reset;
use super::handlers::reset_password::update_password;
use super::handlers::status::status;
use super::middleware::authenticate as auth_middleware;
use super::strategy::RequestAuthenticator;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn AuthServicePort>,
    pub sessions: Arc<dyn SessionManager>,
    pub authenticator: Arc<dyn RequestAuthenticator>,
    /// Name of the cookie carrying the session token.
    pub session_cookie: String,
    /// Paths the authentication middleware never guards.
    pub excluded_paths: Vec<String>,
}

pub fn create_router(state: AppState) -> Router {
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
        .route("/status", get(status))
        .route("/users", post(register))
        .route("/sessions", post(login).delete(logout))
        .route("/profile", get(profile))
        .route("/reset_password", post(request_reset).put(update_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(CookieManagerLayer::new())
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

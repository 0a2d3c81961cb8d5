use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::auth::models::User;
use crate::domain::auth::policy::requires_auth;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated principal into handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Middleware guarding every route not excluded by the path policy.
///
/// A request with no credential at all gets 401; a request whose credential
/// does not resolve to a principal gets 403. Neither response says which
/// resolution stage failed.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    if !requires_auth(req.uri().path(), &state.excluded_paths) {
        return Ok(next.run(req).await);
    }

    if !state.authenticator.credentials_present(&req) {
        return Err(unauthorized());
    }

    let Some(user) = state.authenticator.current_principal(&req).await else {
        tracing::warn!(
            path = %req.uri().path(),
            "request credentials did not resolve to a principal"
        );
        return Err(forbidden());
    };

    req.extensions_mut().insert(AuthenticatedUser { user });
    Ok(next.run(req).await)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "Forbidden" })),
    )
        .into_response()
}

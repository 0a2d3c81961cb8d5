use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use tower_cookies::Cookie;
use tower_cookies::Cookies;

use super::ApiError;
use crate::domain::auth::errors::AuthError;
use crate::inbound::http::router::AppState;

/// POST /sessions. Verifies credentials, opens a session, and sets the
/// session cookie. Invalid credentials answer 401 with the same body whether
/// the email was unknown or the password wrong.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = state
        .service
        .resolve_principal(&body.email, &body.password)
        .await
    else {
        return Err(AuthError::InvalidCredentials.into());
    };

    let token = state.sessions.open(&user).await?;

    let mut cookie = Cookie::new(state.session_cookie.clone(), token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    Ok(Json(LoginResponse {
        email: user.email.as_str().to_string(),
        message: "logged in".to_string(),
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub message: String,
}

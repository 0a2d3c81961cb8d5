use axum::extract::State;
use axum::response::Redirect;
use tower_cookies::Cookie;
use tower_cookies::Cookies;

use super::ApiError;
use crate::inbound::http::router::AppState;

/// DELETE /sessions. The route is excluded from the middleware so the
/// handler itself decides between an invalid session (403) and a destroy.
/// Destroying is idempotent at the session manager; here a second logout
/// simply finds no live session and answers 403.
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Redirect, ApiError> {
    let Some(cookie) = cookies.get(&state.session_cookie) else {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    };
    let token = cookie.value().to_string();

    let destroyed = state.sessions.close(&token).await?;
    if !destroyed {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let mut removal = Cookie::new(state.session_cookie.clone(), "");
    removal.set_path("/");
    cookies.remove(removal);

    Ok(Redirect::to("/status"))
}

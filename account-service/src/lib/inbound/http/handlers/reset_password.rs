use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::domain::auth::errors::AuthError;
use crate::inbound::http::router::AppState;

/// POST /reset_password. Issues a single-use reset token for the account.
/// 403 when the email is unknown.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetTokenRequest>,
) -> Result<Json<ResetTokenResponse>, ApiError> {
    let token = state.service.issue_reset_token(&body.email).await?;

    Ok(Json(ResetTokenResponse {
        email: body.email,
        reset_token: token,
    }))
}

/// PUT /reset_password. Consumes the reset token and installs the new
/// password. 403 when the token is unknown or already consumed.
pub async fn update_password(
    State(state): State<AppState>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<UpdatePasswordResponse>, ApiError> {
    if body.new_password.is_empty() {
        return Err(AuthError::MalformedInput("new_password must not be empty".to_string()).into());
    }

    state
        .service
        .consume_reset_token(&body.reset_token, &body.new_password)
        .await?;

    Ok(Json(UpdatePasswordResponse {
        email: body.email,
        message: "Password updated".to_string(),
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetTokenRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetTokenResponse {
    pub email: String,
    pub reset_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePasswordRequest {
    email: String,
    reset_token: String,
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePasswordResponse {
    pub email: String,
    pub message: String,
}

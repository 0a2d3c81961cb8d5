use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;

pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod reset_password;
pub mod status;

/// API error with the flat `{"message": ...}` body the surface contract uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    UnprocessableEntity(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ApiMessage { message })).into_response()
    }
}

/// Which stage of authentication failed is deliberately not recoverable from
/// the mapped response: every credential-shaped failure collapses into a
/// plain 401/403 so callers cannot enumerate accounts or probe tokens.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyExists(_) => {
                ApiError::BadRequest("email already registered".to_string())
            }
            AuthError::InvalidCredentials => ApiError::Unauthorized("Unauthorized".to_string()),
            AuthError::NotFound(_) | AuthError::InvalidToken => {
                ApiError::Forbidden("Forbidden".to_string())
            }
            AuthError::InvalidEmail(_)
            | AuthError::InvalidUserId(_)
            | AuthError::MalformedInput(_) => ApiError::UnprocessableEntity(err.to_string()),
            AuthError::Password(_) | AuthError::Repository(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

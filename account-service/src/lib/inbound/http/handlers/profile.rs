use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::inbound::http::middleware::AuthenticatedUser;

/// GET /profile. The principal is resolved by the authentication middleware;
/// an unresolvable request never reaches this handler.
pub async fn profile(Extension(auth): Extension<AuthenticatedUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        email: auth.user.email.as_str().to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponse {
    pub email: String,
}

use axum::Json;
use serde_json::json;
use serde_json::Value;

/// GET /status. Liveness, never authenticated.
pub async fn status() -> Json<Value> {
    Json(json!({ "message": "Bienvenue" }))
}

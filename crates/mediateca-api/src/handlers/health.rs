use axum::Json;
use serde_json::json;

/// Liveness endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

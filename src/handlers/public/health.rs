// handlers/public/health.rs - GET /health handler

use axum::response::Json;
use serde_json::{json, Value};

/// Liveness check for orchestration. Never touches the data adapter.
pub async fn get() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

//! Health check endpoint.

use axum::Json;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({ "health": "ok" }))
}

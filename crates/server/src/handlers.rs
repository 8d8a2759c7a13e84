use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::source::SnapshotSource;
use crate::AppState;

/// Serve the holdings snapshot.
pub async fn get_stocks(State(state): State<AppState>) -> Json<Value> {
    Json(load(state.source, state.stocks_path).await)
}

/// Serve the sector snapshot.
pub async fn get_sectors(State(state): State<AppState>) -> Json<Value> {
    Json(load(state.source, state.sectors_path).await)
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Read one snapshot off the async runtime.
///
/// Failures become `{"error": message}` and are still answered with 200:
/// existing clients look for the `error` key rather than the status code.
async fn load(source: Arc<dyn SnapshotSource>, path: PathBuf) -> Value {
    let result = tokio::task::spawn_blocking(move || source.read(&path).map_err(|e| e.to_string()))
        .await
        .unwrap_or_else(|e| Err(format!("snapshot read task failed: {e}")));

    match result {
        Ok(value) => value,
        Err(message) => {
            tracing::warn!(error = %message, "snapshot unavailable");
            json!({ "error": message })
        }
    }
}

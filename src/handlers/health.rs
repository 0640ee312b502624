use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = state.repo.health_check().await;
    let encryption = if state.config.encryption_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    let status = if db_ok { "ok" } else { "unhealthy" };
    let code = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "status": status,
            "service": "moodlog-api",
            "version": env!("CARGO_PKG_VERSION"),
            "encryption": encryption,
        })),
    )
}

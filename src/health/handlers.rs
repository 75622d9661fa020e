use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use serde_json::json;
use tracing::error;

use crate::{
    health::db,
    server::app_state::AppState,
    system_log::models::{Action, LogCeverity},
};

pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/detailed", get(health_detailed))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "OK".into_response()
}

async fn health_detailed(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_status = match db::health_check(state.get_pool()).await {
        Ok(_) => true,
        Err(e) => {
            error!("Failed database health check: {}", e);
            state
                .syslog()
                .action(Action::Other)
                .ceverity(LogCeverity::Critical)
                .file_name("health/handlers.rs")
                .description("Failed health check on database")
                .log_async();

            false
        }
    };

    let json = json!({
        "platform": true,
        "database": db_status,
        "catalog_size": state.get_catalog().len(),
        "active_sessions": state.get_sessions().active_sessions(),
    });

    (StatusCode::OK, Json(json))
}

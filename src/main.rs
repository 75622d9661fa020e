use std::time::Duration;

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{
    config::config::CONFIG, server::app_state::AppState, server::router::build_router,
    session::store::spawn_session_cleanup,
};

mod auth;
mod common;
mod config;
mod health;
mod mw;
mod quiz;
mod server;
mod session;
mod system_log;
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(CONFIG.log_level())
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_config(&CONFIG)
        .await
        .unwrap_or_else(|e| panic!("{}", e));

    spawn_session_cleanup(
        state.clone(),
        Duration::from_secs(CONFIG.session.cleanup_interval_secs.max(1)),
    );

    // Initialize routes
    let app = build_router(state);

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap_or_else(|e| panic!("Failed to bind listener: {}", e));

    info!(
        "Server listening on address: {} ({:?})",
        CONFIG.server.address, CONFIG.environment
    );
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("Server stopped: {}", e));
}

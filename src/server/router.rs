use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
};

use crate::{
    auth::handlers::auth_routes,
    health::handlers::health_routes,
    mw::{auth_mw::auth_mw, request_mw::request_mw, session_mw::session_mw},
    quiz::handlers::quiz_routes,
    server::app_state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .nest("/health", health_routes(state.clone()))
        .nest("/auth", auth_routes(state.clone()));

    let protected_routes =
        quiz_routes(state.clone()).route_layer(from_fn_with_state(state.clone(), auth_mw));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(from_fn_with_state(state.clone(), session_mw))
        .layer(from_fn(request_mw))
}

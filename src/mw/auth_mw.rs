use std::sync::Arc;

use axum::{
    Extension,
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{
    auth::gate::is_authenticated,
    server::{app_state::AppState, error::LOGIN_PATH},
    session::models::VisitorId,
};

pub async fn auth_mw(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !is_authenticated(&state.session(visitor)) {
        debug!("Visitor {} is not logged in, redirecting", visitor);
        return Redirect::to(LOGIN_PATH).into_response();
    }

    next.run(req).await
}

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{server::app_state::AppState, session::models::VisitorId};

/// Resolves the visitor from the session cookie, minting a new id when the
/// cookie is missing or unreadable.
pub async fn session_mw(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let settings = state.get_cookie_settings();
    let existing = jar
        .get(&settings.name)
        .and_then(|cookie| VisitorId::parse(cookie.value()));

    let (visitor, is_new) = match existing {
        Some(visitor) => (visitor, false),
        None => (VisitorId::new(), true),
    };

    req.extensions_mut().insert(visitor);
    let response = next.run(req).await;

    if !is_new || settings.is_set_on(response.headers()) {
        return response;
    }

    debug!("Issued session cookie for new visitor {}", visitor);
    (jar.add(settings.cookie_for(visitor)), response).into_response()
}

use std::sync::Arc;

use axum::{
    Extension, Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    auth::{
        db,
        gate::establish_session,
        models::{CredentialsForm, Identity, RegisteredUser},
    },
    server::{
        app_state::AppState,
        error::{LOGIN_PATH, ServerError},
    },
    session::models::VisitorId,
    system_log::models::{Action, LogCeverity},
};

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .with_state(state)
}

async fn login_form() -> impl IntoResponse {
    let form = json!({
        "action": LOGIN_PATH,
        "method": "POST",
        "fields": ["email", "password"],
    });

    (StatusCode::OK, Json(form))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, ServerError> {
    let Some((email, password)) = form.normalize() else {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            "Email and password are required".into(),
        ));
    };

    let user = db::create_user(state.get_pool(), &email, &password).await?;

    state
        .syslog()
        .subject(&visitor.to_string())
        .action(Action::Create)
        .ceverity(LogCeverity::Info)
        .file_name("auth/handlers.rs")
        .description("New user registered")
        .metadata(json!({ "user_id": user.id }))
        .log_async();

    let body = RegisteredUser {
        id: user.id,
        email: user.email,
    };

    Ok((StatusCode::CREATED, Json(body)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, ServerError> {
    let invalid = || {
        ServerError::Api(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".into(),
        )
    };

    let Some((email, password)) = form.normalize() else {
        return Err(invalid());
    };

    let Some(user) = db::validate_user(state.get_pool(), &email, &password).await? else {
        warn!("Rejected login for visitor {}", visitor);
        state
            .syslog()
            .subject(&visitor.to_string())
            .action(Action::Login)
            .ceverity(LogCeverity::Warning)
            .file_name("auth/handlers.rs")
            .description("Rejected login attempt")
            .log_async();

        return Err(invalid());
    };

    // Authenticated state never lives under an id issued before login
    state.session(visitor).clear();
    let rotated = VisitorId::new();
    establish_session(&state.session(rotated), &Identity::from(&user))?;
    info!("User {} logged in, visitor {} is now {}", user.id, visitor, rotated);

    let cookie = state.get_cookie_settings().cookie_for(rotated);
    Ok((jar.add(cookie), Redirect::to("/")))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
) -> impl IntoResponse {
    state.session(visitor).clear();
    info!("Visitor {} logged out", visitor);

    Redirect::to(LOGIN_PATH)
}

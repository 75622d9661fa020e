use std::sync::Arc;

use axum::{
    Extension, Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    auth::gate::current_identity,
    quiz::models::{QuestionView, QuizError, QuizSummary, SubmitOutcome},
    server::{app_state::AppState, error::ServerError},
    session::models::VisitorId,
    system_log::models::{Action, LogCeverity},
};

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub answer: Option<String>,
}

pub fn quiz_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(start_quiz))
        .route("/question/{position}", get(show_question))
        .route("/submit/{position}", post(submit_answer))
        .route("/finish", get(finish))
        .with_state(state)
}

fn question_path(position: usize) -> String {
    format!("/question/{}", position)
}

async fn start_quiz(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
) -> Result<impl IntoResponse, ServerError> {
    let session = state.session(visitor);
    let mut rng = ChaCha8Rng::from_os_rng();

    let position = match state.quiz_flow().start_quiz(&session, &mut rng) {
        Ok(position) => position,
        Err(QuizError::EmptyCatalog) => {
            error!("Cannot start quiz, catalog is empty");
            state
                .syslog()
                .subject(&visitor.to_string())
                .action(Action::Start)
                .ceverity(LogCeverity::Critical)
                .file_name("quiz/handlers.rs")
                .description("Quiz started with an empty catalog")
                .log_async();

            return Err(QuizError::EmptyCatalog.into());
        }
        Err(e) => return Err(e.into()),
    };

    let user = current_identity(&session)?.map(|identity| identity.user_id);
    info!("Visitor {} started a new quiz as user {:?}", visitor, user);
    Ok(Redirect::to(&question_path(position)))
}

async fn show_question(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
    Path(position): Path<usize>,
) -> Result<Json<QuestionView>, ServerError> {
    let session = state.session(visitor);
    let view = state.quiz_flow().get_question(&session, position)?;

    Ok(Json(view))
}

async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
    Path(position): Path<usize>,
    Form(form): Form<AnswerForm>,
) -> Result<Response, ServerError> {
    let session = state.session(visitor);
    let outcome = state
        .quiz_flow()
        .submit_answer(&session, position, form.answer.as_deref())?;

    let response = match outcome {
        SubmitOutcome::Scored(result) => (StatusCode::OK, Json(result)).into_response(),
        SubmitOutcome::Unanswered { position } => {
            Redirect::to(&question_path(position)).into_response()
        }
    };

    Ok(response)
}

async fn finish(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<VisitorId>,
) -> Result<impl IntoResponse, ServerError> {
    let session = state.session(visitor);
    let summary: QuizSummary = state.quiz_flow().finish(&session)?;

    Ok((StatusCode::OK, Json(summary)))
}

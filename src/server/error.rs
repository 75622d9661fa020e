use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

use crate::{
    auth::models::AuthError, quiz::catalog::CatalogError, quiz::models::QuizError,
    session::models::SessionError,
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const FINISH_PATH: &str = "/finish";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Sqlx failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Quiz(QuizError::OutOfRangeEnd { .. } | QuizError::NoActiveQuiz) => {
                debug!("{}, routing to summary", self);
                Redirect::to(FINISH_PATH).into_response()
            }
            ServerError::Quiz(QuizError::NotAuthenticated) => {
                Redirect::to(LOGIN_PATH).into_response()
            }
            ServerError::Api(status, msg) => (status, msg).into_response(),
            e => {
                error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

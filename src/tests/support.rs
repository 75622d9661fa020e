use std::sync::Arc;

use chrono::Duration;
use indexmap::IndexMap;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

use crate::{
    auth::{gate::establish_session, models::Identity},
    common::db::init_schema,
    quiz::{catalog::Catalog, models::Question},
    server::app_state::AppState,
    session::{
        models::{CookieSettings, VisitorId},
        store::{MemorySessionStore, SessionHandle},
    },
};

pub const COOKIE_NAME: &str = "quiz_session";

pub fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn question(id: u32, answer: &str) -> Question {
    let options: IndexMap<String, String> = ["A", "B", "C"]
        .iter()
        .map(|key| (key.to_string(), format!("Option {} of question {}", key, id)))
        .collect();

    Question {
        id,
        prompt: format!("Question {}", id),
        options,
        answer: answer.to_string(),
    }
}

pub fn catalog_of(size: u32) -> Catalog {
    let answers = ["A", "B", "C"];
    let questions = (0..size)
        .map(|id| question(id, answers[id as usize % answers.len()]))
        .collect();

    Catalog::new(questions).unwrap()
}

pub fn session_store() -> MemorySessionStore {
    MemorySessionStore::new(Duration::days(7))
}

pub fn login(session: &SessionHandle) {
    let identity = Identity {
        user_id: Uuid::new_v4(),
        email: "learner@example.com".into(),
    };
    establish_session(session, &identity).unwrap();
}

pub fn logged_in_visitor(store: &MemorySessionStore) -> VisitorId {
    let visitor = VisitorId::new();
    login(&SessionHandle::new(store, visitor));
    visitor
}

pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    init_schema(&pool).await.unwrap();
    pool
}

pub async fn test_state(catalog: Catalog) -> Arc<AppState> {
    let cookie = CookieSettings {
        name: COOKIE_NAME.into(),
        secure: false,
    };

    AppState::new(memory_pool().await, catalog, session_store(), cookie)
}

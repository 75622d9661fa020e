use std::{str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::{debug, warn};

use crate::{
    common::db,
    config::config::AppConfig,
    quiz::{catalog::Catalog, flow::QuizFlow},
    server::error::ServerError,
    session::{
        models::{CookieSettings, VisitorId},
        store::{MemorySessionStore, SessionHandle},
    },
    system_log::builder::SystemLogBuilder,
};

pub struct AppState {
    pool: SqlitePool,
    catalog: Catalog,
    sessions: MemorySessionStore,
    cookie: CookieSettings,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        catalog: Catalog,
        sessions: MemorySessionStore,
        cookie: CookieSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            pool,
            catalog,
            sessions,
            cookie,
        })
    }

    pub async fn from_config(config: &AppConfig) -> Result<Arc<Self>, ServerError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        db::init_schema(&pool).await?;

        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        debug!(
            "Catalog question ids: {:?}",
            catalog.all().iter().map(|q| q.id).collect::<Vec<_>>()
        );
        if catalog.is_empty() {
            warn!("Quiz catalog is empty, starting a quiz will fail");
        }

        let sessions =
            MemorySessionStore::new(chrono::Duration::days(config.session.lifetime_days));
        let cookie = CookieSettings {
            name: config.session.cookie_name.clone(),
            secure: !config.is_development(),
        };

        Ok(Self::new(pool, catalog, sessions, cookie))
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn get_catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn get_sessions(&self) -> &MemorySessionStore {
        &self.sessions
    }

    pub fn get_cookie_settings(&self) -> &CookieSettings {
        &self.cookie
    }

    pub fn session(&self, visitor: VisitorId) -> SessionHandle<'_> {
        SessionHandle::new(&self.sessions, visitor)
    }

    pub fn quiz_flow(&self) -> QuizFlow<'_> {
        QuizFlow::new(&self.catalog)
    }

    pub fn syslog(&self) -> SystemLogBuilder {
        SystemLogBuilder::new(&self.pool)
    }
}

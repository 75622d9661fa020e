use sqlx::SqlitePool;
use tracing::error;

use crate::{
    server::error::ServerError,
    system_log::{
        db,
        models::{Action, LogCeverity},
    },
};

pub struct SystemLogBuilder {
    pub pool: SqlitePool,
    pub subject: Option<String>,
    pub action: Option<Action>,
    pub ceverity: Option<LogCeverity>,
    pub file_name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl SystemLogBuilder {
    pub fn new(pool: &SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            subject: None,
            action: None,
            ceverity: None,
            file_name: None,
            description: None,
            metadata: None,
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn ceverity(mut self, ceverity: LogCeverity) -> Self {
        self.ceverity = Some(ceverity);
        self
    }

    pub fn file_name(mut self, file_name: &str) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn log(self) -> Result<(), ServerError> {
        let mut description = self
            .description
            .unwrap_or_else(|| "No description".to_string());

        if description.chars().count() > 512 {
            let truncated: String = description.chars().take(509).collect();
            description = format!("{}...", truncated);
        }

        let subject = self.subject.unwrap_or_else(|| "system".into());
        let action = self.action.unwrap_or(Action::Other);
        let ceverity = self.ceverity.unwrap_or(LogCeverity::Info);
        let file_name = self.file_name.unwrap_or_else(|| "Not specified".into());

        db::create_system_log(
            &self.pool,
            &subject,
            &action,
            &ceverity,
            &file_name,
            &description,
            &self.metadata,
        )
        .await
    }

    pub fn log_async(self) {
        tokio::spawn(async move {
            if let Err(e) = self.log().await {
                error!("Failed to system log async: {}", e);
            }
        });
    }
}

use chrono::Utc;
use sqlx::{SqlitePool, types::Json};

#[cfg(test)]
use crate::system_log::models::SystemLog;
use crate::{
    server::error::ServerError,
    system_log::models::{Action, LogCeverity},
};

#[allow(clippy::too_many_arguments)]
pub async fn create_system_log(
    pool: &SqlitePool,
    subject: &str,
    action: &Action,
    ceverity: &LogCeverity,
    file_name: &str,
    description: &str,
    metadata: &Option<serde_json::Value>,
) -> Result<(), ServerError> {
    let row = sqlx::query(
        r#"
        INSERT INTO "system_log" (subject, action, ceverity, file_name, description, metadata, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(subject)
    .bind(action)
    .bind(ceverity)
    .bind(file_name)
    .bind(description)
    .bind(metadata.as_ref().map(Json))
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if row.rows_affected() == 0 {
        return Err(ServerError::Internal("Failed to create system log".into()));
    }

    Ok(())
}

#[cfg(test)]
pub async fn list_recent_system_logs(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<SystemLog>, sqlx::Error> {
    sqlx::query_as::<_, SystemLog>(
        r#"
        SELECT id, subject, action, ceverity, file_name, description, metadata, created_at
        FROM "system_log"
        ORDER BY id DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

use sqlx::SqlitePool;
use tracing::info;

const TABLES: [(&str, &str); 2] = [
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS "users" (
            id BLOB PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "system_log",
        r#"
        CREATE TABLE IF NOT EXISTS "system_log" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            action TEXT NOT NULL,
            ceverity TEXT NOT NULL,
            file_name TEXT NOT NULL,
            description TEXT NOT NULL,
            metadata TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
];

/// Creates any missing table. Returns how many were created.
pub async fn init_schema(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let mut created = 0;

    for (name, ddl) in TABLES {
        let exists = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?
        .is_some();

        if exists {
            continue;
        }

        sqlx::query(ddl).execute(pool).await?;
        info!("Created table {}", name);
        created += 1;
    }

    if created == 0 {
        info!("Database already initialized: tables exist");
    }

    Ok(created)
}

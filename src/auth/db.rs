use axum::http::StatusCode;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{models::User, password},
    server::error::ServerError,
};

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM "users"
        WHERE email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<User, ServerError> {
    if get_user_by_email(pool, email).await?.is_some() {
        return Err(user_exists());
    }

    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: password::hash_password(password)?,
        created_at: Utc::now(),
    };

    insert_user(pool, &user).await?;

    info!("Registered user {}", user.id);
    Ok(user)
}

/// Inserts a user row. A taken email is a conflict even when the caller's
/// existence check raced another registration.
pub async fn insert_user(pool: &SqlitePool, user: &User) -> Result<(), ServerError> {
    let row = sqlx::query(
        r#"
        INSERT INTO "users" (id, email, password_hash, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => user_exists(),
        e => ServerError::from(e),
    })?;

    if row.rows_affected() == 0 {
        return Err(ServerError::Internal("Failed to create user".into()));
    }

    Ok(())
}

fn user_exists() -> ServerError {
    ServerError::Api(StatusCode::CONFLICT, "User already exists".into())
}

/// Returns the user only when the password matches.
pub async fn validate_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, ServerError> {
    let Some(user) = get_user_by_email(pool, email).await? else {
        warn!("Login attempt for unknown email");
        return Ok(None);
    };

    if !password::verify_password(password, &user.password_hash)? {
        warn!("Login attempt with wrong password for user {}", user.id);
        return Ok(None);
    }

    Ok(Some(user))
}

use sqlx::SqlitePool;

pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let _ = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

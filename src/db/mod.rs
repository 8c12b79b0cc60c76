//! Postgres pool and schema.
//!
//! The schema lives in `migrations/` and is applied on every start, so a
//! fresh database needs nothing beyond `DATABASE_URL`.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect with at most `max_connections` and bring the schema up to date.
///
/// # Errors
///
/// Fails when the database is unreachable or a migration does not apply.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

//! Per-user board preferences.

use sqlx::{PgPool, Row};
use todos::Layout;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("stored layout is invalid: {0:?}")]
    InvalidLayout(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub async fn get_layout(pool: &PgPool, user_id: Uuid) -> Result<Layout, SettingsError> {
    let row = sqlx::query("SELECT layout FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(SettingsError::UserNotFound(user_id))?;

    let raw: String = row.get("layout");
    Layout::parse(&raw).ok_or(SettingsError::InvalidLayout(raw))
}

pub async fn set_layout(pool: &PgPool, user_id: Uuid, layout: Layout) -> Result<(), SettingsError> {
    let result = sqlx::query("UPDATE users SET layout = $2 WHERE id = $1")
        .bind(user_id)
        .bind(layout.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SettingsError::UserNotFound(user_id));
    }
    Ok(())
}

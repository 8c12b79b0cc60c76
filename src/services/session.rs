//! Server-side sessions.
//!
//! ARCHITECTURE
//! ============
//! A completed GitHub login mints an opaque random token, stored in the
//! `sessions` table with an expiry and handed to the browser as the
//! httpOnly `session_token` cookie. Every authenticated request looks the
//! token up again, so deleting the row signs the user out immediately.
//! Expired rows for a user are pruned the next time that user logs in.

use std::fmt::Write;

use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

/// Bytes of entropy in a session token.
const SESSION_TOKEN_BYTES: usize = 32;
/// Bytes of entropy in the OAuth `state` nonce.
const OAUTH_STATE_BYTES: usize = 16;

/// `len` random bytes, lowercase hex encoded.
pub(crate) fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(len * 2), |mut hex, b| {
        let _ = write!(hex, "{b:02x}");
        hex
    })
}

#[must_use]
pub fn generate_token() -> String {
    random_hex(SESSION_TOKEN_BYTES)
}

#[must_use]
pub fn generate_oauth_state() -> String {
    random_hex(OAUTH_STATE_BYTES)
}

/// The signed-in user behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
}

impl Account {
    /// Display-only view returned by `GET /api/auth/session`.
    #[must_use]
    pub fn to_session(&self) -> todos::Session {
        todos::Session { user: todos::SessionUser { name: self.name.clone() } }
    }
}

/// Start a session for `user_id` lasting `ttl_days`, returning its token.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_days: i32) -> Result<String, sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= now()")
        .bind(user_id)
        .execute(pool)
        .await?;

    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, now() + make_interval(days => $3))",
    )
    .bind(&token)
    .bind(user_id)
    .bind(ttl_days)
    .execute(pool)
    .await?;
    Ok(token)
}

/// The account owning an unexpired session `token`, if any.
pub async fn lookup_session(pool: &PgPool, token: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r"SELECT u.id, u.name
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

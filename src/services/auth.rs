//! GitHub OAuth: authorize URL, code exchange, profile lookup, user upsert.
//!
//! SYSTEM CONTEXT
//! ==============
//! `routes::auth` drives the browser redirect flow and calls into this
//! module for everything that talks to GitHub or writes the `users` table.
//! GitHub answers a failed code exchange with `200 OK` and an `error` body,
//! so token responses are inspected rather than trusted by status.

use reqwest::Url;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const USER_EMAILS_URL: &str = "https://api.github.com/user/emails";
const CLIENT_USER_AGENT: &str = "leetodo";

/// Scope requested at authorization time.
pub const OAUTH_SCOPE: &str = "user:email";

/// OAuth app credentials. Absent when any `GITHUB_*` variable is unset or blank.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl GitHubConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Some(Self {
            client_id: non_blank_var("GITHUB_CLIENT_ID")?,
            client_secret: non_blank_var("GITHUB_CLIENT_SECRET")?,
            redirect_uri: non_blank_var("GITHUB_REDIRECT_URI")?,
        })
    }

    /// GitHub authorization URL carrying the CSRF `state`.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", OAUTH_SCOPE),
                ("state", state),
            ],
        )
        .map_or_else(|_| AUTHORIZE_URL.to_owned(), String::from)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("github code exchange failed: {0}")]
    Exchange(String),
    #[error("github api error: {0}")]
    GitHub(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// CODE EXCHANGE
// =============================================================================

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_token(self) -> Result<String, AuthError> {
        if let Some(token) = self.access_token.filter(|t| !t.is_empty()) {
            return Ok(token);
        }
        let reason = match (self.error, self.error_description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(code), None) => code,
            (None, _) => "response carried no access token".to_owned(),
        };
        Err(AuthError::Exchange(reason))
    }
}

/// Trade the callback `code` for an access token.
pub async fn exchange_code(http: &reqwest::Client, config: &GitHubConfig, code: &str) -> Result<String, AuthError> {
    let resp = http
        .post(ACCESS_TOKEN_URL)
        .header(ACCEPT, "application/json")
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| AuthError::Exchange(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(AuthError::Exchange(format!("status {}", resp.status())));
    }

    resp.json::<TokenResponse>()
        .await
        .map_err(|e| AuthError::Exchange(e.to_string()))?
        .into_token()
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Debug, serde::Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Public profile email; often hidden.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl GitHubUser {
    /// Profile name when set, otherwise the login handle.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.login.as_str())
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

/// Primary verified address, else any verified one.
#[must_use]
pub fn pick_email(emails: &[GitHubEmail]) -> Option<&str> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| emails.iter().find(|e| e.verified))
        .map(|e| e.email.as_str())
}

async fn github_get<T: DeserializeOwned>(http: &reqwest::Client, url: &str, access_token: &str) -> Result<T, AuthError> {
    let resp = http
        .get(url)
        .bearer_auth(access_token)
        .header(USER_AGENT, CLIENT_USER_AGENT)
        .header(ACCEPT, "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| AuthError::GitHub(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::GitHub(format!("{url}: {status}: {body}")));
    }

    resp.json::<T>().await.map_err(|e| AuthError::GitHub(e.to_string()))
}

pub async fn fetch_github_user(http: &reqwest::Client, access_token: &str) -> Result<GitHubUser, AuthError> {
    github_get(http, USER_URL, access_token).await
}

/// Best address from `/user/emails` (needs the `user:email` scope).
pub async fn fetch_primary_email(http: &reqwest::Client, access_token: &str) -> Result<Option<String>, AuthError> {
    let emails: Vec<GitHubEmail> = github_get(http, USER_EMAILS_URL, access_token).await?;
    Ok(pick_email(&emails).map(str::to_owned))
}

// =============================================================================
// USERS
// =============================================================================

/// Insert or refresh the user keyed by GitHub id. Returns the user's UUID.
/// A missing `email` keeps whatever address was stored before.
pub async fn upsert_user(pool: &PgPool, gh: &GitHubUser, email: Option<&str>) -> Result<Uuid, AuthError> {
    let row = sqlx::query(
        r"INSERT INTO users (github_id, name, email, avatar_url)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (github_id) DO UPDATE SET
              name = EXCLUDED.name,
              email = COALESCE(EXCLUDED.email, users.email),
              avatar_url = EXCLUDED.avatar_url
          RETURNING id",
    )
    .bind(gh.id)
    .bind(gh.display_name())
    .bind(email)
    .bind(gh.avatar_url.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

//! Server configuration loaded from the environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and then builds a [`Config`] once at
//! startup. Optional integrations degrade instead of failing: without GitHub
//! credentials the login routes answer 503.

use crate::services::auth::GitHubConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_DAYS: i32 = 30;
pub const DEFAULT_LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// `APP_ENV=production`.
    pub production: bool,
    pub cookie_secure: bool,
    pub session_ttl_days: i32,
    pub github: Option<GitHubConfig>,
    pub leetcode_graphql_url: String,
}

impl Config {
    /// Build the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric setting
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let production = std::env::var("APP_ENV").is_ok_and(|v| v.trim().eq_ignore_ascii_case("production"));

        Ok(Self {
            database_url,
            port: env_parse_strict("PORT", DEFAULT_PORT)?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            production,
            cookie_secure: resolve_cookie_secure(env_bool("COOKIE_SECURE"), production),
            session_ttl_days: env_parse("SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS).max(1),
            github: GitHubConfig::from_env(),
            leetcode_graphql_url: std::env::var("LEETCODE_GRAPHQL_URL")
                .unwrap_or_else(|_| DEFAULT_LEETCODE_GRAPHQL_URL.to_owned()),
        })
    }
}

/// Cookies are `Secure` in production unless `COOKIE_SECURE` says otherwise.
pub(crate) fn resolve_cookie_secure(explicit: Option<bool>, production: bool) -> bool {
    explicit.unwrap_or(production)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|raw| parse_bool(&raw))
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Like [`env_parse`], but a present-and-malformed value is an error.
fn env_parse_strict<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

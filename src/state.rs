//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the outbound HTTP client used for GitHub and
//! LeetCode, the optional OAuth configuration, and the daily-question cache.
//! There is no per-user in-memory state: the client owns the live list and
//! the server only persists what it is sent.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::GitHubConfig;
use crate::services::questions::DailyCache;

/// Handles shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub http: reqwest::Client,
    /// `None` disables the login routes.
    pub github: Option<Arc<GitHubConfig>>,
    pub cookie_secure: bool,
    pub session_ttl_days: i32,
    pub leetcode_graphql_url: Arc<str>,
    pub daily: DailyCache,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            http: reqwest::Client::new(),
            github: config.github.clone().map(Arc::new),
            cookie_secure: config.cookie_secure,
            session_ttl_days: config.session_ttl_days,
            leetcode_graphql_url: Arc::from(config.leetcode_graphql_url.as_str()),
            daily: DailyCache::default(),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

//! Question lookup: LeetCode daily challenge and title search.
//!
//! SYSTEM CONTEXT
//! ==============
//! The daily question is fetched from LeetCode's GraphQL endpoint at most
//! once per UTC day and cached in memory. Every fetched question is also
//! upserted into the `questions` table, which backs title search for
//! to-do suggestions.

use std::sync::Arc;

use serde::Deserialize;
use sqlx::{PgPool, Row};
use time::{Date, OffsetDateTime};
use todos::{Difficulty, Question, Suggestion};
use tokio::sync::RwLock;
use tracing::{info, warn};

pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SEARCH_LIMIT: i64 = 50;

const DAILY_QUERY: &str = r"query questionOfToday {
  activeDailyCodingChallengeQuestion {
    date
    question { questionFrontendId title titleSlug difficulty topicTags { name } }
  }
}";

#[derive(Debug, thiserror::Error)]
pub enum QuestionError {
    #[error("leetcode request failed: {0}")]
    Upstream(String),
    #[error("unexpected leetcode response: {0}")]
    Malformed(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// DAILY CACHE
// =============================================================================

/// Today's question, keyed by the UTC day it was fetched for.
#[derive(Clone, Default)]
pub struct DailyCache {
    inner: Arc<RwLock<Option<(Date, Question)>>>,
}

impl DailyCache {
    pub async fn get(&self, day: Date) -> Option<Question> {
        let guard = self.inner.read().await;
        match guard.as_ref() {
            Some((cached_day, question)) if *cached_day == day => Some(question.clone()),
            _ => None,
        }
    }

    pub async fn put(&self, day: Date, question: Question) {
        *self.inner.write().await = Some((day, question));
    }
}

// =============================================================================
// GRAPHQL RESPONSE
// =============================================================================

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<DailyData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyData {
    active_daily_coding_challenge_question: Option<DailyChallenge>,
}

#[derive(Deserialize)]
struct DailyChallenge {
    question: RawQuestion,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question_frontend_id: String,
    title: String,
    title_slug: String,
    difficulty: Option<String>,
    #[serde(default)]
    topic_tags: Vec<RawTag>,
}

#[derive(Deserialize)]
struct RawTag {
    name: String,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        Self {
            qid: raw.question_frontend_id,
            title: raw.title,
            title_slug: raw.title_slug,
            difficulty: raw.difficulty.as_deref().and_then(Difficulty::parse),
            tags: raw.topic_tags.into_iter().map(|t| t.name).collect(),
        }
    }
}

/// Extract the daily question from a GraphQL response body.
pub(crate) fn parse_daily(body: &str) -> Result<Question, QuestionError> {
    let resp: GraphQlResponse = serde_json::from_str(body).map_err(|e| QuestionError::Malformed(e.to_string()))?;
    resp.data
        .and_then(|d| d.active_daily_coding_challenge_question)
        .map(|c| Question::from(c.question))
        .ok_or_else(|| QuestionError::Malformed("missing activeDailyCodingChallengeQuestion".into()))
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Fetch the daily question from LeetCode.
pub async fn fetch_daily(http: &reqwest::Client, graphql_url: &str) -> Result<Question, QuestionError> {
    let resp = http
        .post(graphql_url)
        .header("Referer", "https://leetcode.com")
        .json(&serde_json::json!({ "query": DAILY_QUERY, "operationName": "questionOfToday" }))
        .send()
        .await
        .map_err(|e| QuestionError::Upstream(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(QuestionError::Upstream(format!("status {}", resp.status())));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| QuestionError::Upstream(e.to_string()))?;
    parse_daily(&body)
}

/// Today's question, from cache when possible.
pub async fn daily_question(
    pool: &PgPool,
    http: &reqwest::Client,
    graphql_url: &str,
    cache: &DailyCache,
) -> Result<Question, QuestionError> {
    let today = OffsetDateTime::now_utc().date();
    if let Some(question) = cache.get(today).await {
        return Ok(question);
    }

    let question = fetch_daily(http, graphql_url).await?;
    info!(qid = %question.qid, title = %question.title, "daily question fetched");
    cache.put(today, question.clone()).await;

    // Catalog is best-effort; the daily answer does not depend on it.
    if let Err(e) = upsert_question(pool, &question).await {
        warn!(error = %e, qid = %question.qid, "failed to store daily question");
    }
    Ok(question)
}

pub async fn upsert_question(pool: &PgPool, question: &Question) -> Result<(), QuestionError> {
    sqlx::query(
        r"INSERT INTO questions (qid, title, title_slug, difficulty, tags)
          VALUES ($1, $2, $3, $4, $5)
          ON CONFLICT (qid) DO UPDATE SET
              title = EXCLUDED.title,
              title_slug = EXCLUDED.title_slug,
              difficulty = EXCLUDED.difficulty,
              tags = EXCLUDED.tags",
    )
    .bind(&question.qid)
    .bind(&question.title)
    .bind(&question.title_slug)
    .bind(question.difficulty.map(Difficulty::as_str))
    .bind(&question.tags)
    .execute(pool)
    .await?;
    Ok(())
}

/// Escape `%`, `_` and `\` and wrap for a substring `ILIKE`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT)
}

/// Search the catalog by title substring or exact QID.
pub async fn search(pool: &PgPool, query: &str, limit: Option<i64>) -> Result<Vec<Suggestion>, QuestionError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(
        r"SELECT qid, title, title_slug, difficulty, tags
          FROM questions
          WHERE title ILIKE $1 OR qid = $2
          ORDER BY (qid = $2) DESC, length(title), title
          LIMIT $3",
    )
    .bind(like_pattern(query))
    .bind(query)
    .bind(clamp_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let difficulty: Option<String> = r.get("difficulty");
            Question {
                qid: r.get("qid"),
                title: r.get("title"),
                title_slug: r.get("title_slug"),
                difficulty: difficulty.as_deref().and_then(Difficulty::parse),
                tags: r.get("tags"),
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "questions_test.rs"]
mod tests;

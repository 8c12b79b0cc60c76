//! Question routes: today's LeetCode daily and suggestion search.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use todos::{Question, Suggestion};

use crate::services::questions::{self, QuestionError};
use crate::state::AppState;

/// `GET /api/questions/daily`
pub async fn daily(State(state): State<AppState>) -> Result<Json<Question>, StatusCode> {
    let question = questions::daily_question(&state.pool, &state.http, &state.leetcode_graphql_url, &state.daily)
        .await
        .map_err(question_error_to_status)?;
    Ok(Json(question))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    limit: Option<i64>,
}

/// `GET /api/questions/search?q=&limit=`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Suggestion>>, StatusCode> {
    let found = questions::search(&state.pool, &params.q, params.limit)
        .await
        .map_err(question_error_to_status)?;
    Ok(Json(found))
}

pub(crate) fn question_error_to_status(err: QuestionError) -> StatusCode {
    match err {
        QuestionError::Upstream(msg) | QuestionError::Malformed(msg) => {
            tracing::warn!(error = %msg, "leetcode daily unavailable");
            StatusCode::BAD_GATEWAY
        }
        QuestionError::Database(e) => {
            tracing::error!(error = %e, "question query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "questions_test.rs"]
mod tests;

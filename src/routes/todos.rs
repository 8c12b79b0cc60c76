//! To-do list routes: whole-list load and save for the signed-in user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use todos::{SaveResponse, TodoItem};

use crate::routes::auth::AuthUser;
use crate::services::todo::{self, TodoError};
use crate::state::AppState;

/// `GET /api/todos`: the user's list in stored order.
pub async fn list_todos(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<TodoItem>>, StatusCode> {
    let items = todo::load_todos(&state.pool, auth.account.id)
        .await
        .map_err(todo_error_to_status)?;
    Ok(Json(items))
}

/// `PUT /api/todos`: replace the user's list.
pub async fn save_todos(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(items): Json<Vec<TodoItem>>,
) -> Result<Json<SaveResponse>, StatusCode> {
    let saved = todo::save_todos(&state.pool, auth.account.id, &items)
        .await
        .map_err(todo_error_to_status)?;
    tracing::debug!(user_id = %auth.account.id, received = items.len(), saved, "to-do list saved");
    Ok(Json(SaveResponse { saved }))
}

pub(crate) fn todo_error_to_status(err: TodoError) -> StatusCode {
    match err {
        TodoError::DuplicateId(id) => {
            tracing::debug!(%id, "rejected list with duplicate id");
            StatusCode::BAD_REQUEST
        }
        TodoError::Database(e) => {
            tracing::error!(error = %e, "to-do persistence failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "todos_test.rs"]
mod tests;

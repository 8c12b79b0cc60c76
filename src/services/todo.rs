//! To-do persistence: whole-list load and save per user.
//!
//! DESIGN
//! ======
//! The client always sends its entire list. A save upserts every item by id,
//! records list order in `position`, and deletes the user's rows that are no
//! longer in the list, all in one transaction. Rows owned by another user are
//! never overwritten: the conflict update is guarded on `user_id`.

use std::collections::HashSet;

use sqlx::{PgPool, Row};
use todos::{Difficulty, TodoItem};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("duplicate to-do id: {0}")]
    DuplicateId(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Reject lists that use the same id twice.
pub fn ensure_unique_ids(items: &[TodoItem]) -> Result<(), TodoError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            return Err(TodoError::DuplicateId(item.id));
        }
    }
    Ok(())
}

/// Load the user's list in saved order.
pub async fn load_todos(pool: &PgPool, user_id: Uuid) -> Result<Vec<TodoItem>, TodoError> {
    let rows = sqlx::query(
        r"SELECT id, title, done, tags, difficulty, date, title_slug, qid
          FROM todos
          WHERE user_id = $1
          ORDER BY position, updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let difficulty: Option<String> = r.get("difficulty");
            TodoItem {
                id: r.get("id"),
                title: r.get("title"),
                done: r.get("done"),
                tags: r.get("tags"),
                difficulty: difficulty.as_deref().and_then(Difficulty::parse),
                date: r.get("date"),
                title_slug: r.get("title_slug"),
                qid: r.get("qid"),
            }
        })
        .collect())
}

/// Replace the user's list with `items`. Returns the number of rows written.
pub async fn save_todos(pool: &PgPool, user_id: Uuid, items: &[TodoItem]) -> Result<usize, TodoError> {
    ensure_unique_ids(items)?;

    let mut tx = pool.begin().await?;
    let mut written = 0usize;
    for (index, item) in items.iter().enumerate() {
        let position = i32::try_from(index).unwrap_or(i32::MAX);
        let result = sqlx::query(
            r"INSERT INTO todos (id, user_id, position, title, done, tags, difficulty, date, title_slug, qid)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
              ON CONFLICT (id) DO UPDATE SET
                  position = EXCLUDED.position,
                  title = EXCLUDED.title,
                  done = EXCLUDED.done,
                  tags = EXCLUDED.tags,
                  difficulty = EXCLUDED.difficulty,
                  date = EXCLUDED.date,
                  title_slug = EXCLUDED.title_slug,
                  qid = EXCLUDED.qid,
                  updated_at = now()
              WHERE todos.user_id = EXCLUDED.user_id",
        )
        .bind(item.id)
        .bind(user_id)
        .bind(position)
        .bind(&item.title)
        .bind(item.done)
        .bind(&item.tags)
        .bind(item.difficulty.map(Difficulty::as_str))
        .bind(item.date)
        .bind(&item.title_slug)
        .bind(&item.qid)
        .execute(tx.as_mut())
        .await?;

        if result.rows_affected() == 0 {
            warn!(todo_id = %item.id, %user_id, "to-do id owned by another user; skipped");
        } else {
            written += 1;
        }
    }

    let keep: Vec<Uuid> = items.iter().map(|t| t.id).collect();
    sqlx::query("DELETE FROM todos WHERE user_id = $1 AND NOT (id = ANY($2))")
        .bind(user_id)
        .bind(&keep)
        .execute(tx.as_mut())
        .await?;

    tx.commit().await?;
    Ok(written)
}

#[cfg(test)]
#[path = "todo_test.rs"]
mod tests;

//! Debounced autosave of the to-do list.
//!
//! DESIGN
//! ======
//! One task watches the store. Each change restarts a fixed delay; when the
//! delay elapses with no further change, the latest full list is handed to a
//! [`TodoSink`] in one call. Trailing edge only: no leading save, no max wait.
//!
//! ERROR HANDLING
//! ==============
//! Saves run on their own task and are never retried. The outcome is
//! published as a [`SaveNotice`] stamped with the store revision it covers;
//! local state is never rolled back, so the next change simply saves the
//! whole list again. Saves already sent are awaited before the task ends.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::TodoItem;
use crate::store::TodoStore;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Error returned by a [`TodoSink`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("not signed in")]
    Unauthorized,
    #[error("save request failed: {0}")]
    Transport(String),
    #[error("server rejected save: {0}")]
    Rejected(String),
}

/// Destination for whole-list saves.
#[async_trait::async_trait]
pub trait TodoSink: Send + Sync + 'static {
    async fn save_todos(&self, todos: &[TodoItem]) -> Result<(), SaveError>;
}

/// Non-fatal outcome of a background save. `revision` is the
/// [`TodoStore::revision`] of the list that was sent.
#[derive(Debug, Clone)]
pub enum SaveNotice {
    Saved { count: usize, revision: u64 },
    Failed { error: SaveError, revision: u64 },
}

impl SaveNotice {
    #[must_use]
    pub fn revision(&self) -> u64 {
        match self {
            Self::Saved { revision, .. } | Self::Failed { revision, .. } => *revision,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AutosaveConfig {
    /// Quiet period required before a save fires.
    pub delay: Duration,
    /// Saves are skipped entirely when the user is not signed in.
    pub authenticated: bool,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { delay: DEFAULT_AUTOSAVE_DELAY, authenticated: true }
    }
}

/// Spawn the autosave task for `store`.
///
/// The task holds no reference to the store and ends when it is dropped; a
/// save still waiting on its delay at that point is discarded, while saves
/// already in flight are awaited.
pub fn spawn_autosave<S: TodoSink>(
    store: &TodoStore,
    sink: Arc<S>,
    config: AutosaveConfig,
    notices: Option<mpsc::Sender<SaveNotice>>,
) -> JoinHandle<()> {
    let mut todos = store.subscribe();
    let revisions = store.revision_counter();
    let delay_ms = u64::try_from(config.delay.as_millis()).unwrap_or(u64::MAX);
    info!(delay_ms, authenticated = config.authenticated, "autosave started");
    tokio::spawn(async move {
        let mut in_flight = JoinSet::new();
        while todos.changed().await.is_ok() {
            if !settle(&mut todos, config.delay).await {
                break;
            }
            while in_flight.try_join_next().is_some() {}

            let (snapshot, revision) = read_latest(&mut todos, &revisions);
            if !config.authenticated || snapshot.is_empty() {
                debug!(count = snapshot.len(), revision, "autosave skipped");
                continue;
            }

            debug!(count = snapshot.len(), revision, "autosave firing");
            let sink = Arc::clone(&sink);
            let notices = notices.clone();
            in_flight.spawn(async move {
                let count = snapshot.len();
                let notice = match sink.save_todos(&snapshot).await {
                    Ok(()) => SaveNotice::Saved { count, revision },
                    Err(error) => {
                        warn!(error = %error, count, revision, "autosave failed; keeping local state");
                        SaveNotice::Failed { error, revision }
                    }
                };
                publish(notices.as_ref(), notice);
            });
        }
        if !in_flight.is_empty() {
            debug!(saves = in_flight.len(), "autosave waiting for saves in flight");
        }
        while in_flight.join_next().await.is_some() {}
        debug!("autosave stopped");
    })
}

/// Latest list and its revision. The revision is read while the value is
/// borrowed, so no mutation can slip between the two.
fn read_latest(todos: &mut watch::Receiver<Vec<TodoItem>>, revisions: &AtomicU64) -> (Vec<TodoItem>, u64) {
    let latest = todos.borrow_and_update();
    let revision = revisions.load(Ordering::Acquire);
    (latest.clone(), revision)
}

/// Wait until `delay` passes with no further change. Returns `false` if the
/// store went away first.
async fn settle(todos: &mut watch::Receiver<Vec<TodoItem>>, delay: Duration) -> bool {
    loop {
        tokio::select! {
            changed = todos.changed() => {
                if changed.is_err() {
                    return false;
                }
            }
            () = tokio::time::sleep(delay) => return true,
        }
    }
}

fn publish(notices: Option<&mpsc::Sender<SaveNotice>>, notice: SaveNotice) {
    let Some(tx) = notices else {
        return;
    };
    match tx.try_send(notice) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => warn!("save notice queue full; dropping notice"),
        Err(mpsc::error::TrySendError::Closed(_)) => {}
    }
}

#[cfg(test)]
#[path = "autosave_test.rs"]
mod tests;

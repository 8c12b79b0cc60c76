//! Reactive to-do store.
//!
//! DESIGN
//! ======
//! The list lives in a `tokio::sync::watch` channel. Mutations apply
//! immediately (optimistic) and wake subscribers only when the list actually
//! changed, so no-op edits never trigger a save. Subscribers always observe
//! the latest full list; intermediate states may be coalesced.
//!
//! Every notifying mutation bumps a revision number under the channel's
//! write lock, so a reader holding the value can tell which edit it saw.
//!
//! Presentation state that is not persisted with the list (section
//! collapse flags, selected filters, daily goal, layout) is kept separately
//! in [`BoardState`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::{Date, Duration};
use tokio::sync::watch;
use uuid::Uuid;

use crate::views::{Filters, Section};
use crate::{Layout, NewTodo, Question, Suggestion, TodoItem, tomorrow};

/// Result of [`TodoStore::toggle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// `done` after the toggle.
    pub done: bool,
    /// The toggled to-do is today's daily question.
    pub daily_done: bool,
}

/// In-memory, observable list of to-dos.
#[derive(Debug)]
pub struct TodoStore {
    todos: watch::Sender<Vec<TodoItem>>,
    revision: Arc<AtomicU64>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Seed the store with a list loaded from the server. Seeding does not
    /// count as a change for subscribers created afterwards.
    #[must_use]
    pub fn with_items(items: Vec<TodoItem>) -> Self {
        let (todos, _) = watch::channel(items);
        Self { todos, revision: Arc::new(AtomicU64::new(0)) }
    }

    /// Observe the list. The value current at subscription time is marked seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<TodoItem>> {
        self.todos.subscribe()
    }

    /// Number of list changes so far; 0 for the seeded list.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Counter behind [`revision`](Self::revision), for observers that
    /// must not keep the store alive.
    pub(crate) fn revision_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.revision)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.todos.borrow().clone()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<TodoItem> {
        self.todos.borrow().iter().find(|t| t.id == id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.borrow().is_empty()
    }

    /// Resolve a full id or a unique id prefix to an id in the list.
    #[must_use]
    pub fn resolve(&self, needle: &str) -> Option<Uuid> {
        let needle = needle.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        let todos = self.todos.borrow();
        let mut hits = todos.iter().filter(|t| t.id.to_string().starts_with(&needle));
        let first = hits.next()?;
        if hits.next().is_some() {
            return None;
        }
        Some(first.id)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Prepend a new to-do and return its id.
    pub fn add(&self, initial: NewTodo) -> Uuid {
        let item = TodoItem::new(initial);
        let id = item.id;
        self.modify(|todos| {
            todos.insert(0, item);
            true
        });
        id
    }

    /// Add a to-do dated today, pre-filled from the active filters.
    pub fn add_in_progress(&self, filters: &Filters, today: Date) -> Uuid {
        self.add(NewTodo {
            date: Some(today),
            difficulty: filters.first_difficulty(),
            tags: filters.selected_tags(),
            ..NewTodo::default()
        })
    }

    /// Add a to-do dated tomorrow, pre-filled from the active filters.
    pub fn add_planned(&self, filters: &Filters, today: Date) -> Uuid {
        self.add(NewTodo {
            date: Some(tomorrow(today)),
            difficulty: filters.first_difficulty(),
            tags: filters.selected_tags(),
            ..NewTodo::default()
        })
    }

    /// Remove the to-do with `id`. Returns `false` when no such to-do exists.
    pub fn remove(&self, id: Uuid) -> bool {
        self.modify(|todos| {
            let Some(pos) = todos.iter().position(|t| t.id == id) else {
                return false;
            };
            todos.remove(pos);
            true
        })
    }

    /// Flip `done` and stamp the to-do with `today`.
    ///
    /// `daily_done` is reported when `daily` is known and shares the to-do's QID.
    pub fn toggle(&self, id: Uuid, today: Date, daily: Option<&Question>) -> Option<ToggleOutcome> {
        let mut outcome = None;
        self.update(id, |todo| {
            todo.done = !todo.done;
            todo.date = Some(today);
            let daily_done = match (daily, todo.qid.as_deref()) {
                (Some(q), Some(qid)) => q.qid == qid,
                _ => false,
            };
            outcome = Some(ToggleOutcome { done: todo.done, daily_done });
        });
        outcome
    }

    pub fn set_title(&self, id: Uuid, title: impl Into<String>) -> bool {
        let title = title.into();
        self.update(id, |todo| todo.title = title)
    }

    /// Fill a to-do from a search suggestion, or clear its title and
    /// difficulty when the selection is removed.
    pub fn apply_suggestion(&self, id: Uuid, suggestion: Option<Suggestion>) -> bool {
        self.update(id, |todo| match suggestion {
            Some(s) => {
                todo.title = s.title;
                todo.difficulty = s.difficulty;
                todo.tags = s.tags;
                todo.title_slug = Some(s.title_slug);
                todo.qid = Some(s.qid);
            }
            None => {
                todo.title.clear();
                todo.difficulty = None;
            }
        })
    }

    pub fn set_date(&self, id: Uuid, date: Option<Date>) -> bool {
        self.update(id, |todo| todo.date = date)
    }

    /// Move a dated to-do by `days`. Undated to-dos are left alone.
    pub fn shift_date(&self, id: Uuid, days: i64) -> bool {
        self.modify(|todos| {
            let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            let Some(shifted) = todo.date.and_then(|d| d.checked_add(Duration::days(days))) else {
                return false;
            };
            todo.date = Some(shifted);
            true
        })
    }

    /// Apply `f` to the to-do with `id`, notifying only if it changed.
    fn update(&self, id: Uuid, f: impl FnOnce(&mut TodoItem)) -> bool {
        self.modify(|todos| {
            let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            let before = todo.clone();
            f(todo);
            *todo != before
        })
    }

    /// Run `f` on the list; when it reports a change, bump the revision and
    /// wake subscribers.
    fn modify(&self, f: impl FnOnce(&mut Vec<TodoItem>) -> bool) -> bool {
        self.todos.send_if_modified(|todos| {
            let changed = f(todos);
            if changed {
                self.revision.fetch_add(1, Ordering::AcqRel);
            }
            changed
        })
    }
}

// =============================================================================
// BOARD STATE
// =============================================================================

/// Which board sections are expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionOpen {
    pub in_progress: bool,
    pub planned: bool,
    pub done: bool,
}

impl Default for SectionOpen {
    fn default() -> Self {
        Self { in_progress: true, planned: true, done: true }
    }
}

impl SectionOpen {
    #[must_use]
    pub fn is_open(&self, section: Section) -> bool {
        match section {
            Section::InProgress => self.in_progress,
            Section::Planned => self.planned,
            Section::Done => self.done,
        }
    }

    pub fn set(&mut self, section: Section, open: bool) {
        match section {
            Section::InProgress => self.in_progress = open,
            Section::Planned => self.planned = open,
            Section::Done => self.done = open,
        }
    }
}

/// Presentation state for the board. Not persisted with the list.
#[derive(Clone, Debug, Default)]
pub struct BoardState {
    pub sections: SectionOpen,
    pub filters: Filters,
    pub daily_done: bool,
    pub layout: Layout,
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

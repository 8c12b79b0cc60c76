//! Shared to-do model for the `leetodo` server and client.
//!
//! This crate owns the JSON representation of to-dos, questions and layout
//! preferences, plus the client-side pieces that sit on top of it: the
//! reactive [`store::TodoStore`], the derived [`views`], and the debounced
//! [`autosave`] task.

pub mod autosave;
pub mod store;
pub mod views;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

// =============================================================================
// DIFFICULTY
// =============================================================================

/// Problem difficulty as reported by LeetCode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse a difficulty label, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

// =============================================================================
// TODO ITEM
// =============================================================================

/// A single practice item. The whole list is persisted per user on save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Scheduled (or completed) calendar day, serialized as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_slug: Option<String>,
    /// LeetCode question id this item refers to.
    #[serde(rename = "QID", default, skip_serializing_if = "Option::is_none")]
    pub qid: Option<String>,
}

/// Initial values for a new to-do. Anything left unset takes the default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub date: Option<Date>,
    pub title_slug: Option<String>,
    pub qid: Option<String>,
}

impl TodoItem {
    /// Build a fresh, not-done item with a new random id.
    #[must_use]
    pub fn new(initial: NewTodo) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: initial.title.unwrap_or_default(),
            done: false,
            tags: initial.tags,
            difficulty: initial.difficulty,
            date: initial.date,
            title_slug: initial.title_slug,
            qid: initial.qid,
        }
    }

    /// Public problem URL, when the item is linked to a problem.
    #[must_use]
    pub fn problem_url(&self) -> Option<String> {
        self.title_slug
            .as_deref()
            .map(|slug| format!("https://leetcode.com/problems/{slug}/"))
    }
}

// =============================================================================
// QUESTIONS
// =============================================================================

/// A LeetCode problem. Used both for the daily question and for search
/// suggestions that fill in a to-do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "QID")]
    pub qid: String,
    pub title: String,
    pub title_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Search hit offered while typing a to-do title.
pub type Suggestion = Question;

// =============================================================================
// LAYOUT / SESSION
// =============================================================================

/// Board layout preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Sections stacked vertically.
    #[default]
    Row,
    /// Sections side by side.
    Col,
}

impl Layout {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Row => Self::Col,
            Self::Col => Self::Row,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Col => "col",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "row" => Some(Self::Row),
            "col" => Some(Self::Col),
            _ => None,
        }
    }
}

/// Body of `GET/PUT /api/settings/layout`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBody {
    pub layout: Layout,
}

/// Display-only user info carried by a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
}

/// Body of `GET /api/auth/session`; the endpoint returns `null` when signed out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
}

/// Body of a successful `PUT /api/todos`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: usize,
}

// =============================================================================
// DATES
// =============================================================================

/// Current local calendar day, falling back to UTC when the local offset
/// cannot be determined.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// The day after `day`, saturating at the calendar's upper bound.
#[must_use]
pub fn tomorrow(day: Date) -> Date {
    day.next_day().unwrap_or(day)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

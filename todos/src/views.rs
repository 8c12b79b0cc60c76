//! Derived views over the to-do list.
//!
//! DESIGN
//! ======
//! Views borrow from the list and never mutate it. Filtering keeps list
//! order; the three sections partition the filtered list exactly, and a
//! to-do with no date always lands in "in progress".

use std::collections::{BTreeMap, BTreeSet};

use time::Date;

use crate::{Difficulty, TodoItem};

/// Board section a to-do is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    InProgress,
    Planned,
    Done,
}

impl Section {
    pub const ALL: [Self; 3] = [Self::InProgress, Self::Planned, Self::Done];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Planned => "Planned",
            Self::Done => "Done",
        }
    }

    /// Parse a section name as typed in the shell.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "progress" | "in-progress" | "inprogress" => Some(Self::InProgress),
            "planned" | "future" => Some(Self::Planned),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Section a single to-do belongs to, relative to `today`.
#[must_use]
pub fn section_of(todo: &TodoItem, today: Date) -> Section {
    if todo.done {
        return Section::Done;
    }
    match todo.date {
        Some(date) if date > today => Section::Planned,
        _ => Section::InProgress,
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Tag and difficulty filters selected on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    pub difficulty: BTreeSet<Difficulty>,
    pub tags: BTreeSet<String>,
}

impl Filters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_empty() && self.tags.is_empty()
    }

    /// A to-do passes when each non-empty filter set matches it. Tags match
    /// on any shared tag.
    #[must_use]
    pub fn matches(&self, todo: &TodoItem) -> bool {
        let difficulty_ok = self.difficulty.is_empty()
            || todo.difficulty.is_some_and(|d| self.difficulty.contains(&d));
        let tags_ok = self.tags.is_empty() || todo.tags.iter().any(|t| self.tags.contains(t));
        difficulty_ok && tags_ok
    }

    /// First selected difficulty, used as the default for new to-dos.
    #[must_use]
    pub fn first_difficulty(&self) -> Option<Difficulty> {
        self.difficulty.iter().next().copied()
    }

    #[must_use]
    pub fn selected_tags(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }
}

/// Apply `filters` to `todos`, preserving order.
#[must_use]
pub fn filter<'a>(todos: &'a [TodoItem], filters: &Filters) -> Vec<&'a TodoItem> {
    todos.iter().filter(|t| filters.matches(t)).collect()
}

// =============================================================================
// PARTITION
// =============================================================================

/// The three board sections computed from one filtered list.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub in_progress: Vec<&'a TodoItem>,
    pub planned: Vec<&'a TodoItem>,
    pub done: Vec<&'a TodoItem>,
}

impl<'a> Partition<'a> {
    #[must_use]
    pub fn section(&self, section: Section) -> &[&'a TodoItem] {
        match section {
            Section::InProgress => &self.in_progress,
            Section::Planned => &self.planned,
            Section::Done => &self.done,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.in_progress.len() + self.planned.len() + self.done.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `todos` into in-progress, planned and done, preserving order.
pub fn partition<'a, I>(todos: I, today: Date) -> Partition<'a>
where
    I: IntoIterator<Item = &'a TodoItem>,
{
    let mut out = Partition::default();
    for todo in todos {
        match section_of(todo, today) {
            Section::InProgress => out.in_progress.push(todo),
            Section::Planned => out.planned.push(todo),
            Section::Done => out.done.push(todo),
        }
    }
    out
}

/// Filter then partition; the board's view of the list.
#[must_use]
pub fn board<'a>(todos: &'a [TodoItem], filters: &Filters, today: Date) -> Partition<'a> {
    partition(todos.iter().filter(|t| filters.matches(t)), today)
}

// =============================================================================
// GROUP BY DATE
// =============================================================================

/// Direction for [`group_by_date`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateOrder {
    Increasing,
    Decreasing,
}

/// Group to-dos by day. Undated items form one group that sorts first when
/// increasing and last when decreasing. Items keep list order within a group.
#[must_use]
pub fn group_by_date<'a>(todos: &[&'a TodoItem], order: DateOrder) -> Vec<(Option<Date>, Vec<&'a TodoItem>)> {
    let mut groups: BTreeMap<Option<Date>, Vec<&'a TodoItem>> = BTreeMap::new();
    for todo in todos {
        groups.entry(todo.date).or_default().push(*todo);
    }
    let grouped = groups.into_iter();
    match order {
        DateOrder::Increasing => grouped.collect(),
        DateOrder::Decreasing => grouped.rev().collect(),
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;

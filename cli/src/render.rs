//! Plain-text rendering of the board.
//!
//! `row` layout stacks the three sections; `col` layout puts them side by
//! side in fixed-width columns. Planned items are grouped by day ascending,
//! done items by day descending.

use time::Date;
use todos::store::BoardState;
use todos::views::{self, DateOrder, Partition, Section};
use todos::{Difficulty, Layout, Question, TodoItem};

const COLUMN_WIDTH: usize = 38;
const COLUMN_GAP: &str = " | ";

/// First eight hex digits of the id; enough to address a to-do in commands.
#[must_use]
pub fn short_id(todo: &TodoItem) -> String {
    todo.id.simple().to_string().chars().take(8).collect()
}

#[must_use]
pub fn todo_line(todo: &TodoItem, show_date: bool) -> String {
    let mark = if todo.done { 'x' } else { ' ' };
    let title = if todo.title.trim().is_empty() { "(untitled)" } else { todo.title.as_str() };
    let mut line = format!("{} [{mark}] {title}", short_id(todo));
    if let Some(difficulty) = todo.difficulty {
        line.push_str(&format!(" ({})", difficulty.as_str()));
    }
    for tag in &todo.tags {
        line.push_str(&format!(" #{tag}"));
    }
    if show_date {
        if let Some(date) = todo.date {
            line.push_str(&format!(" @{date}"));
        }
    }
    line
}

#[must_use]
pub fn question_line(question: &Question) -> String {
    let mut line = format!("{}. {}", question.qid, question.title);
    if let Some(difficulty) = question.difficulty {
        line.push_str(&format!(" ({})", difficulty.as_str()));
    }
    if !question.tags.is_empty() {
        line.push_str(&format!(" [{}]", question.tags.join(", ")));
    }
    line
}

fn section_lines(partition: &Partition<'_>, section: Section, state: &BoardState) -> Vec<String> {
    let items = partition.section(section);
    let mut lines = Vec::new();
    if !state.sections.is_open(section) {
        lines.push(format!("{} ({}) [collapsed]", section.label(), items.len()));
        return lines;
    }
    lines.push(format!("{} ({})", section.label(), items.len()));

    let order = match section {
        Section::InProgress => {
            lines.extend(items.iter().map(|t| format!("  {}", todo_line(t, true))));
            return lines;
        }
        Section::Planned => DateOrder::Increasing,
        Section::Done => DateOrder::Decreasing,
    };

    for (date, group) in views::group_by_date(items, order) {
        lines.push(match date {
            Some(date) => format!("  {date}"),
            None => "  no date".to_owned(),
        });
        lines.extend(group.iter().map(|t| format!("    {}", todo_line(t, false))));
    }
    lines
}

fn header_lines(state: &BoardState) -> Vec<String> {
    let mut lines = Vec::new();
    if state.daily_done {
        lines.push("daily challenge done".to_owned());
    }
    if !state.filters.is_empty() {
        let mut parts = Vec::new();
        if !state.filters.difficulty.is_empty() {
            let names: Vec<&str> = state.filters.difficulty.iter().copied().map(Difficulty::as_str).collect();
            parts.push(format!("difficulty={}", names.join(",")));
        }
        if !state.filters.tags.is_empty() {
            parts.push(format!("tag={}", state.filters.selected_tags().join(",")));
        }
        lines.push(format!("filters: {}", parts.join(" ")));
    }
    lines
}

fn fit(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return format!("{cell:<width$}");
    }
    let mut cut: String = cell.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

fn side_by_side(blocks: &[Vec<String>]) -> Vec<String> {
    let rows = blocks.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|row| {
            let cells: Vec<String> = blocks
                .iter()
                .map(|block| fit(block.get(row).map_or("", String::as_str), COLUMN_WIDTH))
                .collect();
            cells.join(COLUMN_GAP).trim_end().to_owned()
        })
        .collect()
}

/// Render the filtered board for `today`.
#[must_use]
pub fn board(todos: &[TodoItem], state: &BoardState, today: Date) -> String {
    let partition = views::board(todos, &state.filters, today);
    let blocks: Vec<Vec<String>> = Section::ALL
        .iter()
        .map(|section| section_lines(&partition, *section, state))
        .collect();

    let mut lines = header_lines(state);
    match state.layout {
        Layout::Row => {
            for (i, block) in blocks.into_iter().enumerate() {
                if i > 0 {
                    lines.push(String::new());
                }
                lines.extend(block);
            }
        }
        Layout::Col => lines.extend(side_by_side(&blocks)),
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

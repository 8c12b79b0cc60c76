//! Board commands shared by one-shot invocations and the interactive shell.
//!
//! DESIGN
//! ======
//! Every command mutates the local [`TodoStore`] first and reports what it
//! did into an output buffer. Persisting the list is the caller's job: the
//! one-shot path saves right away, the shell leaves it to autosave.

use std::fmt::Write;

use clap::{Subcommand, ValueEnum};
use time::Date;
use time::macros::format_description;
use todos::store::{BoardState, TodoStore};
use todos::views::{self, Filters, Section};
use todos::{Difficulty, Layout, Question, TodoItem};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::CliError;
use crate::api::ApiClient;
use crate::render;

/// `YYYY-MM-DD`, or `none` to clear the date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateArg(pub Option<Date>);

pub(crate) fn parse_date_arg(raw: &str) -> Result<DateArg, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Ok(DateArg(None));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| DateArg(Some(d)))
        .map_err(|e| format!("expected YYYY-MM-DD or `none`: {e}"))
}

pub(crate) fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    Difficulty::parse(raw).ok_or_else(|| format!("unknown difficulty {raw:?}; expected easy, medium or hard"))
}

pub(crate) fn parse_section(raw: &str) -> Result<Section, String> {
    Section::parse(raw).ok_or_else(|| format!("unknown section {raw:?}; expected progress, planned or done"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutAction {
    Toggle,
    Row,
    Col,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    /// Show the board.
    #[command(alias = "ls")]
    List {
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Vec<Difficulty>,
        #[arg(long)]
        tag: Vec<String>,
        /// Print the filtered list as JSON instead of the board.
        #[arg(long)]
        json: bool,
    },
    /// Add a to-do dated today (or tomorrow with --planned).
    Add {
        #[arg(long)]
        planned: bool,
        title: Vec<String>,
    },
    /// Mark a to-do done, or reopen it.
    Toggle { id: String },
    #[command(alias = "rm")]
    Remove { id: String },
    Title {
        id: String,
        #[arg(required = true)]
        title: Vec<String>,
    },
    Date {
        id: String,
        #[arg(value_parser = parse_date_arg)]
        date: DateArg,
    },
    /// Move a dated to-do by a number of days.
    Shift {
        id: String,
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    /// Fill a to-do from the best search match; `--clear` empties its title and difficulty.
    Pick {
        id: String,
        #[arg(long, conflicts_with = "query")]
        clear: bool,
        #[arg(required_unless_present = "clear")]
        query: Vec<String>,
    },
    /// Show today's LeetCode daily question.
    Daily,
    Search {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show or change the board layout.
    Layout {
        #[arg(value_enum)]
        action: Option<LayoutAction>,
    },
}

/// Local board: the list plus presentation state.
#[derive(Debug, Default)]
pub struct Board {
    pub store: TodoStore,
    pub state: BoardState,
    pub daily: Option<Question>,
    /// Server accepted the session; saves are possible.
    pub authenticated: bool,
}

impl Board {
    /// Signed-out board: empty list, nothing is saved.
    #[must_use]
    pub fn local() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(items: Vec<TodoItem>, layout: Layout) -> Self {
        Self {
            store: TodoStore::with_items(items),
            state: BoardState { layout, ..BoardState::default() },
            daily: None,
            authenticated: true,
        }
    }

    fn resolve(&self, needle: &str) -> Result<Uuid, CliError> {
        self.store
            .resolve(needle)
            .ok_or_else(|| CliError::UnknownTodo(needle.to_owned()))
    }

    fn short(&self, id: Uuid) -> String {
        self.store.get(id).map(|t| render::short_id(&t)).unwrap_or_default()
    }
}

/// Load the signed-in user's board, or fall back to a local one.
pub async fn load_board(api: &ApiClient) -> Result<Board, CliError> {
    if !api.has_session() {
        return Ok(Board::local());
    }

    let items = match api.load_todos().await {
        Ok(items) => items,
        Err(CliError::Unauthorized) => {
            warn!("session rejected by server; working locally without saving");
            return Ok(Board::local());
        }
        Err(e) => return Err(e),
    };

    let layout = api.layout().await.unwrap_or_else(|e| {
        warn!(error = %e, "layout preference unavailable; using default");
        Layout::default()
    });
    debug!(count = items.len(), layout = layout.as_str(), "board loaded");
    Ok(Board::signed_in(items, layout))
}

fn filters_from(difficulty: Vec<Difficulty>, tags: Vec<String>) -> Filters {
    Filters { difficulty: difficulty.into_iter().collect(), tags: tags.into_iter().collect() }
}

/// Fill `id` from the top search hit. A search with no hit leaves the to-do as it was.
fn apply_pick(board: &Board, id: Uuid, query: &str, best: Option<Question>, out: &mut String) {
    match best {
        Some(q) => {
            let _ = writeln!(out, "{} <- {}", board.short(id), render::question_line(&q));
            board.store.apply_suggestion(id, Some(q));
        }
        None => {
            let _ = writeln!(out, "no match for {query:?}; {} unchanged", board.short(id));
        }
    }
}

/// Run one board command against `board`, writing human-readable output to `out`.
pub async fn run(
    board: &mut Board,
    api: &ApiClient,
    command: BoardCommand,
    today: Date,
    out: &mut String,
) -> Result<(), CliError> {
    match command {
        BoardCommand::List { difficulty, tag, json } => {
            let mut state = board.state.clone();
            if !difficulty.is_empty() || !tag.is_empty() {
                state.filters = filters_from(difficulty, tag);
            }
            let todos = board.store.snapshot();
            if json {
                let filtered = views::filter(&todos, &state.filters);
                out.push_str(&serde_json::to_string_pretty(&filtered)?);
            } else {
                out.push_str(&render::board(&todos, &state, today));
            }
            out.push('\n');
        }
        BoardCommand::Add { planned, title } => {
            let section = if planned { Section::Planned } else { Section::InProgress };
            if !board.state.sections.is_open(section) {
                return Err(CliError::SectionCollapsed(section.label()));
            }
            let id = if planned {
                board.store.add_planned(&board.state.filters, today)
            } else {
                board.store.add_in_progress(&board.state.filters, today)
            };
            if !title.is_empty() {
                board.store.set_title(id, title.join(" "));
            }
            let _ = writeln!(out, "added {} to {}", board.short(id), section.label());
        }
        BoardCommand::Toggle { id } => {
            let id = board.resolve(&id)?;
            if board.daily.is_none() && board.authenticated {
                match api.daily().await {
                    Ok(q) => board.daily = Some(q),
                    Err(e) => debug!(error = %e, "daily question unavailable"),
                }
            }
            if let Some(outcome) = board.store.toggle(id, today, board.daily.as_ref()) {
                let verb = if outcome.done { "done" } else { "reopened" };
                let _ = writeln!(out, "{} {verb}", board.short(id));
                if outcome.daily_done && outcome.done {
                    board.state.daily_done = true;
                    let _ = writeln!(out, "daily challenge done!");
                }
            }
        }
        BoardCommand::Remove { id } => {
            let id = board.resolve(&id)?;
            let short = board.short(id);
            if board.store.remove(id) {
                let _ = writeln!(out, "removed {short}");
            }
        }
        BoardCommand::Title { id, title } => {
            let id = board.resolve(&id)?;
            board.store.set_title(id, title.join(" "));
            let _ = writeln!(out, "renamed {}", board.short(id));
        }
        BoardCommand::Date { id, date } => {
            let id = board.resolve(&id)?;
            board.store.set_date(id, date.0);
            match date.0 {
                Some(d) => {
                    let _ = writeln!(out, "{} dated {d}", board.short(id));
                }
                None => {
                    let _ = writeln!(out, "{} undated", board.short(id));
                }
            }
        }
        BoardCommand::Shift { id, days } => {
            let id = board.resolve(&id)?;
            if board.store.shift_date(id, days) {
                let date = board.store.get(id).and_then(|t| t.date);
                let date = date.as_ref().map(ToString::to_string).unwrap_or_default();
                let _ = writeln!(out, "{} moved to {date}", board.short(id));
            } else {
                let _ = writeln!(out, "{} has no date to shift", board.short(id));
            }
        }
        BoardCommand::Pick { id, clear, query } => {
            let id = board.resolve(&id)?;
            if clear {
                board.store.apply_suggestion(id, None);
                let _ = writeln!(out, "cleared {}", board.short(id));
                return Ok(());
            }
            let query = query.join(" ");
            let best = api.search(&query, 1).await?.into_iter().next();
            apply_pick(board, id, &query, best, out);
        }
        BoardCommand::Daily => {
            let question = api.daily().await?;
            let _ = writeln!(out, "{}", render::question_line(&question));
            let _ = writeln!(out, "https://leetcode.com/problems/{}/", question.title_slug);
            board.daily = Some(question);
        }
        BoardCommand::Search { limit, query } => {
            let found = api.search(&query.join(" "), limit).await?;
            if found.is_empty() {
                let _ = writeln!(out, "no matches");
            }
            for q in &found {
                let _ = writeln!(out, "{}", render::question_line(q));
            }
        }
        BoardCommand::Layout { action } => {
            let Some(action) = action else {
                let _ = writeln!(out, "layout: {}", board.state.layout.as_str());
                return Ok(());
            };
            let layout = match action {
                LayoutAction::Toggle => board.state.layout.toggled(),
                LayoutAction::Row => Layout::Row,
                LayoutAction::Col => Layout::Col,
            };
            if board.authenticated {
                api.set_layout(layout).await?;
            }
            board.state.layout = layout;
            let _ = writeln!(out, "layout: {}", layout.as_str());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

//! Interactive board shell.
//!
//! ARCHITECTURE
//! ============
//! The shell loads the list once and then applies each typed command to the
//! local store immediately. It never saves directly: a debounced autosave
//! task watches the store and writes the whole list after a quiet period,
//! reporting each outcome as a notice that the shell prints between
//! commands. Notices carry the store revision they saved, and only a notice
//! at or past the shell's latest change settles it. On quit the shell waits
//! for that notice; closing the store any earlier would discard the save.

use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use time::Date;
use todos::autosave::{self, AutosaveConfig, SaveNotice};
use todos::views::{Filters, Section};
use todos::{Difficulty, TodoItem};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::CliError;
use crate::api::ApiClient;
use crate::commands::{self, Board, BoardCommand, parse_difficulty, parse_section};
use crate::render;

/// How long past the debounce delay `quit` waits for the last save.
const SAVE_GRACE: Duration = Duration::from_secs(15);
const NOTICE_BUFFER: usize = 16;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "leetodo>")]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Board(BoardCommand),
    /// Hide a section.
    Collapse {
        #[arg(value_parser = parse_section)]
        section: Section,
    },
    /// Show a hidden section.
    Expand {
        #[arg(value_parser = parse_section)]
        section: Section,
    },
    /// Toggle a difficulty or tag filter.
    Filter {
        #[command(subcommand)]
        kind: FilterKind,
    },
    ClearFilters,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
enum FilterKind {
    Difficulty {
        #[arg(value_parser = parse_difficulty)]
        value: Difficulty,
    },
    Tag {
        #[arg(required = true)]
        value: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    board: Board,
    api: Arc<ApiClient>,
    changes: watch::Receiver<Vec<TodoItem>>,
    delay: Duration,
    last_change: Option<Instant>,
    /// Revision of the latest change no save notice has covered yet.
    pending: Option<u64>,
}

impl Shell {
    #[must_use]
    pub fn new(board: Board, api: Arc<ApiClient>, delay: Duration) -> Self {
        let changes = board.store.subscribe();
        Self { board, api, changes, delay, last_change: None, pending: None }
    }

    /// Run one input line. Parse errors and help are written to `out`.
    pub async fn execute(&mut self, line: &str, today: Date, out: &mut String) -> Result<Flow, CliError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                let _ = write!(out, "{}", e.render());
                return Ok(Flow::Continue);
            }
        };

        match parsed.command {
            ShellCommand::Board(command) => {
                commands::run(&mut self.board, &self.api, command, today, out).await?;
            }
            ShellCommand::Collapse { section } => self.board.state.sections.set(section, false),
            ShellCommand::Expand { section } => self.board.state.sections.set(section, true),
            ShellCommand::Filter { kind } => {
                let filters = &mut self.board.state.filters;
                match kind {
                    FilterKind::Difficulty { value } => {
                        if !filters.difficulty.remove(&value) {
                            filters.difficulty.insert(value);
                        }
                    }
                    FilterKind::Tag { value } => {
                        let tag = value.join(" ");
                        if !filters.tags.remove(&tag) {
                            filters.tags.insert(tag);
                        }
                    }
                }
            }
            ShellCommand::ClearFilters => self.board.state.filters = Filters::default(),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        if self.changes.has_changed().unwrap_or(false) {
            self.changes.mark_unchanged();
            self.last_change = Some(Instant::now());
            self.pending = Some(self.board.store.revision());
            out.push_str(&render::board(&self.board.store.snapshot(), &self.board.state, today));
            out.push('\n');
        }
        Ok(Flow::Continue)
    }

    /// Record a save notice. Notices for an older revision leave the latest
    /// change pending.
    pub fn on_notice(&mut self, notice: &SaveNotice) -> String {
        if self.pending.is_some_and(|pending| notice.revision() >= pending) {
            self.pending = None;
        }
        notice_line(notice)
    }

    /// Whether `quit` must wait for autosave before closing the store.
    #[must_use]
    pub fn needs_flush(&self) -> bool {
        self.pending.is_some() && self.board.authenticated && !self.board.store.is_empty()
    }

    async fn flush(&mut self, notices: &mut mpsc::Receiver<SaveNotice>) {
        let Some(last) = self.last_change else {
            return;
        };
        if !self.needs_flush() {
            return;
        }
        println!("waiting for autosave...");
        let deadline = last + self.delay + SAVE_GRACE;
        while self.needs_flush() {
            match tokio::time::timeout_at(deadline, notices.recv()).await {
                Ok(Some(notice)) => println!("{}", self.on_notice(&notice)),
                Ok(None) | Err(_) => {
                    eprintln!("warning: last changes may not have been saved");
                    break;
                }
            }
        }
    }
}

#[must_use]
pub fn notice_line(notice: &SaveNotice) -> String {
    match notice {
        SaveNotice::Saved { count, .. } => format!("saved {count} to-dos"),
        SaveNotice::Failed { error, .. } => format!("warning: autosave failed ({error}); local changes kept"),
    }
}

/// Run the shell on stdin until `quit` or end of input.
pub async fn run(board: Board, api: ApiClient, delay: Duration) -> Result<(), CliError> {
    let api = Arc::new(api);
    let (tx, mut notices) = mpsc::channel(NOTICE_BUFFER);
    let config = AutosaveConfig { delay, authenticated: board.authenticated };
    let autosave = autosave::spawn_autosave(&board.store, Arc::clone(&api), config, Some(tx));

    if !board.authenticated {
        println!("not signed in; changes stay local (run `leetodo-cli login`)");
    }
    println!("{}", render::board(&board.store.snapshot(), &board.state, todos::today()));

    let mut shell = Shell::new(board, api, delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let mut out = String::new();
                let flow = shell.execute(&line, todos::today(), &mut out).await;
                print!("{out}");
                match flow {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Some(notice) = notices.recv() => println!("{}", shell.on_notice(&notice)),
        }
    }

    shell.flush(&mut notices).await;
    drop(shell);
    let _ = autosave.await;
    Ok(())
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;

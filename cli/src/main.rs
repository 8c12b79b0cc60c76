mod api;
mod commands;
mod render;
mod shell;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::Level;

use crate::api::ApiClient;
use crate::commands::BoardCommand;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("not signed in; run `leetodo-cli login` and set LEETODO_SESSION_TOKEN")]
    Unauthorized,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("no single to-do matches {0:?}")]
    UnknownTodo(String),
    #[error("{0} section is collapsed; expand it first")]
    SectionCollapsed(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "leetodo", about = "LeetCode practice to-do list")]
struct Cli {
    #[arg(long, env = "LEETODO_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "LEETODO_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    /// Quiet period before the shell saves, in milliseconds.
    #[arg(long, env = "AUTOSAVE_DELAY_MS", default_value_t = 2000)]
    autosave_delay_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the URL that starts the GitHub login.
    Login,
    /// Show who is signed in.
    Session,
    /// Interactive board; changes are saved by debounced autosave.
    Shell,
    #[command(flatten)]
    Board(BoardCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::WARN)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let api = ApiClient::new(&cli.base_url, cli.session_token.as_deref())?;

    match cli.command {
        Command::Login => {
            println!("open {} in a browser, then copy the `session_token` cookie", api.login_url());
            println!("into LEETODO_SESSION_TOKEN (or pass --session-token)");
            Ok(())
        }
        Command::Session => {
            match api.session().await? {
                Some(session) => println!("signed in as {}", session.user.name),
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Shell => {
            let board = commands::load_board(&api).await?;
            shell::run(board, api, Duration::from_millis(cli.autosave_delay_ms)).await
        }
        Command::Board(command) => run_once(&api, command).await,
    }
}

/// Apply one command and save the result immediately.
async fn run_once(api: &ApiClient, command: BoardCommand) -> Result<(), CliError> {
    let mut board = commands::load_board(api).await?;
    let changes = board.store.subscribe();

    let mut out = String::new();
    commands::run(&mut board, api, command, todos::today(), &mut out).await?;
    print!("{out}");

    if changes.has_changed().unwrap_or(false) {
        if board.authenticated {
            let saved = api.put_todos(&board.store.snapshot()).await?;
            println!("saved {} to-dos", saved.saved);
        } else {
            eprintln!("not signed in; change was not saved");
        }
    }
    Ok(())
}

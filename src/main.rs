mod config;
mod db;
mod routes;
mod services;
mod state;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "leetodo server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = config::Config::from_env()?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;

    if config.github.is_none() {
        tracing::warn!("GitHub OAuth not configured; login disabled");
    }

    let state = state::AppState::new(pool, &config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, production = config.production, "leetodo listening");
    axum::serve(listener, app).await?;
    Ok(())
}

use std::str::FromStr;

use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

#[macro_use]
extern crate lazy_static;

#[macro_use]
mod macros;

mod api;
mod cli;
mod cookies;
mod db;
mod env;
mod error;
mod html;
mod jwt;
mod permissions;
mod routes;
mod templates;
mod traits;
mod util;

pub use error::{AppError, AppResult};
pub use traits::RequestBody;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();

    let options = SqliteConnectOptions::from_str(&env::DATABASE_URL)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .connect_with(options)
        .await?;

    let state = AppState { pool };

    match args.command.unwrap_or_default() {
        cli::Command::Run => {
            state.migrate().await?;
            serve(state).await?;
        }
        cli::Command::Migrate => state.migrate().await?,
        cli::Command::Reset => {
            state.reset().await?;
            state.migrate().await?;
        }
    }

    Ok(())
}

async fn serve(state: AppState) -> eyre::Result<()> {
    let app = routes::router().with_state(state);
    let listener = tokio::net::TcpListener::bind(&*env::BIND_ADDR).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

mod error;
mod predictor;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coalwatch_repository::PostgresRepository;
use state::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Coal stockpile ignition-risk service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Create the database tables and exit
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => serve().await,
        Command::InitDb => {
            let repository = connect_repository().await?;
            repository.bootstrap().await?;
            info!("database tables created");
            Ok(())
        }
    }
}

async fn serve() -> Result<()> {
    let repository = connect_repository().await?;
    repository.bootstrap().await?;

    let state = AppState::new(repository);
    let router = routes::router(state);

    let bind = std::env::var("COALWATCH_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}

async fn connect_repository() -> Result<PostgresRepository> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("COALWATCH_DATABASE_URL"))
        .context("DATABASE_URL (or COALWATCH_DATABASE_URL) must be set")?;
    PostgresRepository::connect(&database_url, 5)
        .await
        .context("failed to connect to Postgres")
}

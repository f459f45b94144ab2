mod config;
mod db;
mod display;
mod planner;
mod server;
mod timetable;
mod types;

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::db::TimetableDbManager;
use crate::planner::PlannerClient;
use crate::timetable::{Constraints, DraftScheduler, Subject};
use crate::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load()?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("draft") => run_draft(&config, &args[2..]),
        Some("serve") | None => serve(config).await,
        Some(other) => anyhow::bail!(
            "Unknown command {:?}. Usage: timetable [serve | draft [constraints.json] [subjects.json] [seed]]",
            other
        ),
    }
}

/// Prints a local draft to stdout.
fn run_draft(config: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let constraints: Constraints = match args.first() {
        Some(path) => read_json(path)?,
        None => Constraints::default(),
    };
    let subjects: Vec<Subject> = match args.get(1) {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let seed = match args.get(2) {
        Some(raw) => raw.parse().with_context(|| format!("Invalid seed {:?}", raw))?,
        None => rand::thread_rng().gen(),
    };

    let document = DraftScheduler::new(config.draft_window).draft(&constraints, &subjects, seed);
    print!("{}", display::render_timetable(&constraints, &document));
    println!("\n(seed {})", seed);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = TimetableDbManager::open(&config.database_path, &config.store_name)?;
    let planner = PlannerClient::new(config.planner.clone())?;
    if config.planner.api_key.is_none() {
        info!("No planner API key configured; AI generation will fail until one is set");
    }

    let address = config.bind_address();
    let state = Arc::new(AppState::new(config, store, planner));
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on ctrl-c. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!("Failed to listen for ctrl-c, graceful shutdown disabled: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

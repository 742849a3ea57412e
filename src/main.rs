//! helpdesk-forecast - ticket demand forecasting service

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use helpdesk_forecast::config::AppConfig;
use helpdesk_forecast::forecast::DemandForecaster;
use helpdesk_forecast::generator::initialize;
use helpdesk_forecast::observability::init_tracing;
use helpdesk_forecast::server::{create_router, AppState};
use helpdesk_forecast::store::TicketStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "helpdesk-forecast",
    version,
    about = "Monthly ticket demand forecasting for an IT help desk",
    long_about = "Keeps a log of help-desk tickets and forecasts how many tickets of a\n\
                  category will be opened in a given month.\n\
                  \n\
                  Examples:\n\
                    helpdesk-forecast serve --port 8080\n\
                    helpdesk-forecast predict --month 2025-06 --category Network\n\
                    helpdesk-forecast seed --count 500"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to a TOML config file
    #[arg(long, short = 'c', env = "HELPDESK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Seed history and serve the HTTP API (default)
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
        /// Keep existing tickets instead of reseeding on startup
        #[arg(long)]
        keep_data: bool,
    },
    /// Print one forecast as JSON and exit
    Predict {
        /// Target month, YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Network, Software or Hardware
        #[arg(long)]
        category: Option<String>,
    },
    /// Replace the stored history with freshly generated tickets
    Seed {
        /// Number of tickets (overrides the config file)
        #[arg(long)]
        count: Option<usize>,
        /// Random seed for reproducible history
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AppConfig::default(),
    };

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    let store = config.store.open().context("Failed to open ticket store")?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        keep_data: false,
    }) {
        Command::Serve { port, keep_data } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if !keep_data {
                seed_store(store.as_ref(), &config)?;
            }
            run_server(store, config).await
        }
        Command::Predict { month, category } => {
            if store.scan_all().context("Failed to read tickets")?.is_empty() {
                seed_store(store.as_ref(), &config)?;
            }
            let forecaster = DemandForecaster::new(store, config.forecast);
            let response = forecaster.predict(month.as_deref(), category.as_deref());
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.status() != 200 {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Seed { count, seed } => {
            if let Some(count) = count {
                config.generator.count = count;
            }
            if seed.is_some() {
                config.generator.seed = seed;
            }
            let inserted = seed_store(store.as_ref(), &config)?;
            println!("Seeded {inserted} tickets");
            Ok(())
        }
    }
}

fn seed_store(store: &dyn TicketStore, config: &AppConfig) -> Result<usize> {
    initialize(store, &config.generator, Local::now().naive_local())
        .context("Failed to seed ticket history")
}

async fn run_server(store: Arc<dyn TicketStore>, config: AppConfig) -> Result<()> {
    let forecaster = DemandForecaster::new(store.clone(), config.forecast.clone());
    let router = create_router(AppState::new(forecaster, store));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

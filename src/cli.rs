//! Command-line interface

use crate::api::ApiServer;
use crate::config::AppConfig;
use crate::error::Result;
use crate::providers::{QuoteSource, YahooChartSource};
use crate::scheduler::CollectionScheduler;
use crate::services::{format_price, CollectorService, OutcomeStatus, QueryService};
use crate::state::AppState;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "index-monitor", version, about = "Collect market index quotes and serve them over HTTP")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the SQLite database path
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the collection scheduler and the REST API (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one collection cycle and show the newest stored rows
    Collect {
        #[arg(long, default_value_t = 10)]
        show: usize,
    },
    /// Fetch current prices without storing them
    Fetch,
}

impl Cli {
    fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }

    /// Load configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(database) = &self.database {
            config.database_path = database.clone();
        }

        if let Some(Command::Serve { host, port }) = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Execute the parsed command
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    match cli.command() {
        Command::Serve { .. } => serve(Arc::new(AppState::new(config)?)).await,
        Command::Collect { show } => collect(&AppState::new(config)?, show).await,
        // Fetch never opens the database.
        Command::Fetch => {
            let source = YahooChartSource::new(&config.provider)?;
            fetch(&config, &source).await
        }
    }
}

async fn serve(state: Arc<AppState>) -> Result<()> {
    let scheduler = CollectionScheduler::new(Arc::clone(&state)).start();

    let mut server = ApiServer::new(Arc::clone(&state));
    server
        .start(&state.config.server.host, state.config.server.port)
        .await?;

    info!("Press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    server.shutdown().await;
    scheduler.shutdown().await;
    Ok(())
}

async fn collect(state: &AppState, show: usize) -> Result<()> {
    let report = CollectorService::run(state).await?;
    println!(
        "Collected {} of {} indices",
        report.succeeded(),
        report.outcomes.len()
    );

    if show > 0 {
        println!("Most recent {} records:", show);
        for obs in QueryService::recent(state, show)? {
            println!(
                "ID: {} | {:10} | {:10} | price: {:>12} | {}",
                obs.id,
                obs.name,
                obs.ticker,
                format_price(obs.price),
                obs.collected_at
            );
        }
    }

    println!("Database file: {}", state.config.database_path.display());
    Ok(())
}

async fn fetch(config: &AppConfig, source: &dyn QuoteSource) -> Result<()> {
    let report = CollectorService::fetch_only(source, &config.indices, &config.provider.range).await;

    for outcome in &report.outcomes {
        match &outcome.status {
            OutcomeStatus::Collected { price, .. } => {
                println!("{} ({}): {}", outcome.name, outcome.ticker, format_price(*price))
            }
            OutcomeStatus::Failed { reason } => {
                println!("{} ({}): failed - {}", outcome.name, outcome.ticker, reason)
            }
        }
    }

    Ok(())
}

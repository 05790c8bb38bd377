use clap::Parser;
use index_monitor::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    index_monitor::init_tracing();

    tracing::info!("Starting Index Monitor...");
    cli::run(cli).await?;
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nowrank::app::{self, RunContext, Sources};
use nowrank::cli::Cli;
use nowrank::report;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();

    let cli = Cli::parse();
    let ctx = RunContext::load(&cli.data_dir, cli.rank_options(), cli.fetch_missing)?;
    let sources = Sources::live(&ctx.settings)?;
    let outcome = app::run(&ctx, &sources).await?;

    print!("{}", report::render(&outcome.rows));
    Ok(())
}

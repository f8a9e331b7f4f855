//! `ingest` - one ingestion run, invoked by the external scheduler.

use anyhow::{Context, Result};
use clap::Parser;
use ingestion::{pipeline, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usajobs_client::UsaJobsClient;

#[derive(Parser)]
#[command(
    name = "ingest",
    about = "Extracts USAJobs postings and loads them into the warehouse"
)]
struct Args {
    /// Search keyword
    #[arg(long, default_value = "Data Engineering")]
    keyword: String,

    /// First page to request (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Warehouse schema receiving the staging tables
    #[arg(long, default_value = "src")]
    schema: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url())
        .await
        .context("Failed to connect to database")?;

    let client = UsaJobsClient::new(config.api.clone());

    // All failure kinds look alike to the scheduler: logged, exit 1.
    if let Err(e) = pipeline::run(&pool, client, &args.keyword, args.page, &args.schema).await {
        tracing::error!(error = %e, "pipeline run failed");
        std::process::exit(1);
    }

    Ok(())
}

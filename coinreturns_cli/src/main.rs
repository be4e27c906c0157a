mod commands;
mod output;
mod xml_output;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coinreturns_lib::cache::MemoryCache;
use coinreturns_lib::CachedClient;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "coinreturns")]
#[command(about = "Compare cumulative returns of crypto assets over a date window")]
struct Cli {
    /// Output format: table, json, csv, markdown, xml
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the returns of two assets over a window
    Compare(commands::compare::CompareArgs),
    /// Show both assets' closing prices on a shared date axis
    Prices(commands::prices::PricesArgs),
    /// Show the date range each symbol has data for
    Availability(commands::availability::AvailabilityArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coinreturns=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "md" | "markdown" => OutputFormat::Markdown,
        "xml" => OutputFormat::Xml,
        _ => OutputFormat::Table,
    };

    let ttl = std::env::var("COINRETURNS_CACHE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(300);
    let cache = MemoryCache::new(Duration::from_secs(ttl));
    let client = CachedClient::new(cache);

    match &cli.command {
        Commands::Compare(args) => commands::compare::run(args, &client, &format).await?,
        Commands::Prices(args) => commands::prices::run(args, &client, &format).await?,
        Commands::Availability(args) => {
            commands::availability::run(args, &client, &format).await?
        }
    }

    Ok(())
}

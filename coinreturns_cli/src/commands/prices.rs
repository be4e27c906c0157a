use anyhow::{bail, Result};
use clap::Args;
use coinreturns_lib::validation;
use coinreturns_lib::CachedClient;

use super::{spinner, WindowArgs};
use crate::output::{
    print_json, print_prices_csv, print_prices_markdown, print_prices_table, print_prices_xml,
    OutputFormat, PricesOutput,
};

#[derive(Args)]
pub struct PricesArgs {
    /// First symbol
    #[arg(default_value = "BTC-USD")]
    pub first: String,

    /// Second symbol
    #[arg(default_value = "ETH-USD")]
    pub second: String,

    #[command(flatten)]
    pub window: WindowArgs,
}

pub async fn run(args: &PricesArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let (first, second) = validation::validate_pair(&args.first, &args.second)?;
    let requested = args.window.requested()?;
    let days = args.window.default_days()?;

    let pb = spinner(format!("Fetching {} and {}", first, second));
    let outcome = client.overlay(&first, &second, requested, days).await;
    pb.finish_and_clear();

    let (window, rows) = match outcome {
        Ok(overlay) => overlay,
        Err(e) if e.is_data_unavailable() => bail!("Data not available: {}", e),
        Err(e) => return Err(e.into()),
    };

    eprintln!(
        "{} rows from {} to {}",
        rows.len(),
        window.start(),
        window.end()
    );

    let out = PricesOutput {
        first,
        second,
        window,
        rows,
    };

    match format {
        OutputFormat::Table => print_prices_table(&out),
        OutputFormat::Json => print_json(&out),
        OutputFormat::Csv => print_prices_csv(&out)?,
        OutputFormat::Markdown => print_prices_markdown(&out),
        OutputFormat::Xml => print_prices_xml(&out)?,
    }

    Ok(())
}

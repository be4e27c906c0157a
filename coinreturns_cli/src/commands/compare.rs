use anyhow::{bail, Result};
use clap::Args;
use coinreturns_lib::validation;
use coinreturns_lib::{CachedClient, CompareOptions, ComparisonResult, WindowAdjustment};

use super::{spinner, WindowArgs};
use crate::output::{
    print_comparison_csv, print_comparison_markdown, print_comparison_table,
    print_comparison_xml, print_json, OutputFormat,
};

#[derive(Args)]
pub struct CompareArgs {
    /// First symbol
    #[arg(default_value = "BTC-USD")]
    pub first: String,

    /// Second symbol
    #[arg(default_value = "ETH-USD")]
    pub second: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// How window bounds map to price dates: as-of, slice
    #[arg(long, default_value = "as-of")]
    pub lookup: String,
}

pub async fn run(args: &CompareArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let (first, second) = validation::validate_pair(&args.first, &args.second)?;
    let requested = args.window.requested()?;
    let options = CompareOptions {
        default_days: args.window.default_days()?,
        lookup: validation::validate_lookup(&args.lookup)?,
    };

    let pb = spinner(format!("Fetching {} and {}", first, second));
    let outcome = client.compare(&first, &second, requested, &options).await;
    pb.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_data_unavailable() => bail!("Data not available: {}", e),
        Err(e) => return Err(e.into()),
    };

    report_adjustment(&result);

    match format {
        OutputFormat::Table => print_comparison_table(&result),
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_comparison_csv(&result)?,
        OutputFormat::Markdown => print_comparison_markdown(&result),
        OutputFormat::Xml => print_comparison_xml(&result)?,
    }

    Ok(())
}

fn report_adjustment(result: &ComparisonResult) {
    match result.adjustment {
        WindowAdjustment::None => {}
        WindowAdjustment::Clamped => eprintln!(
            "Window clipped to the common data range: {} to {}",
            result.window.start(),
            result.window.end()
        ),
        WindowAdjustment::Widened => eprintln!(
            "Window held fewer than two prices; widened to {} to {}",
            result.window.start(),
            result.window.end()
        ),
        WindowAdjustment::ClampedAndWidened => eprintln!(
            "Window clipped to the common data range and widened to {} to {}",
            result.window.start(),
            result.window.end()
        ),
    }
}

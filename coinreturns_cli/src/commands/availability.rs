use anyhow::Result;
use clap::Args;
use coinreturns_lib::validation;
use coinreturns_lib::{Availability, CachedClient};

use super::spinner;
use crate::output::{
    print_availability_csv, print_availability_markdown, print_availability_table,
    print_availability_xml, print_json, OutputFormat,
};

#[derive(Args)]
pub struct AvailabilityArgs {
    /// Symbols to look up
    #[arg(required = true)]
    pub symbols: Vec<String>,
}

pub async fn run(
    args: &AvailabilityArgs,
    client: &CachedClient,
    format: &OutputFormat,
) -> Result<()> {
    let symbols = args
        .symbols
        .iter()
        .map(|s| validation::validate_symbol(s))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = spinner(format!("Fetching {} symbol(s)", symbols.len()));
    let mut found: Vec<Availability> = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        match client.series(symbol).await {
            Ok(series) => found.push(Availability::from(series.as_ref())),
            Err(e) if e.is_data_unavailable() => {
                pb.suspend(|| eprintln!("{}: data not available ({})", symbol, e));
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e.into());
            }
        }
    }
    pb.finish_and_clear();

    match format {
        OutputFormat::Table => print_availability_table(&found),
        OutputFormat::Json => print_json(&found),
        OutputFormat::Csv => print_availability_csv(&found)?,
        OutputFormat::Markdown => print_availability_markdown(&found),
        OutputFormat::Xml => print_availability_xml(&found)?,
    }

    Ok(())
}

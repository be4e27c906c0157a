use anyhow::Result;
use coinreturns_lib::{
    Availability, ComparisonResult, ComparisonWindow, OverlayRow, ReturnClass, WindowedReturn,
};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::xml_output;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
    Xml,
}

/// Price overlay of two symbols as printed by the `prices` command.
#[derive(Debug, Serialize)]
pub struct PricesOutput {
    pub first: String,
    pub second: String,
    pub window: ComparisonWindow,
    pub rows: Vec<OverlayRow>,
}

#[derive(Tabled, Serialize)]
struct ReturnRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Return")]
    #[serde(rename = "Return")]
    return_percent: String,
    #[tabled(rename = "Class")]
    #[serde(rename = "Class")]
    class: String,
    #[tabled(rename = "Tier")]
    #[serde(rename = "Tier")]
    tier: u8,
    #[tabled(rename = "From")]
    #[serde(rename = "From")]
    start_date: String,
    #[tabled(rename = "To")]
    #[serde(rename = "To")]
    end_date: String,
}

#[derive(Tabled, Serialize)]
struct AvailabilityRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "First Date")]
    #[serde(rename = "First Date")]
    min_date: String,
    #[tabled(rename = "Last Date")]
    #[serde(rename = "Last Date")]
    max_date: String,
    #[tabled(rename = "Prices")]
    #[serde(rename = "Prices")]
    points: usize,
}

// -- Row builders --

fn build_return_rows(entries: &[WindowedReturn]) -> Vec<ReturnRow> {
    entries
        .iter()
        .map(|e| ReturnRow {
            symbol: e.symbol.clone(),
            return_percent: format_percent(e.return_percent, e.color_class),
            class: e.color_class.to_string(),
            tier: e.heading_tier.rank(),
            start_date: e.start_date.to_string(),
            end_date: e.end_date.to_string(),
        })
        .collect()
}

fn build_availability_rows(availability: &[Availability]) -> Vec<AvailabilityRow> {
    availability
        .iter()
        .map(|a| AvailabilityRow {
            symbol: a.symbol.clone(),
            min_date: a.min_date.to_string(),
            max_date: a.max_date.to_string(),
            points: a.points,
        })
        .collect()
}

fn price_records(out: &PricesOutput) -> Vec<[String; 3]> {
    out.rows
        .iter()
        .map(|r| {
            [
                r.date.to_string(),
                r.first.map(format_price).unwrap_or_default(),
                r.second.map(format_price).unwrap_or_default(),
            ]
        })
        .collect()
}

fn prices_table(out: &PricesOutput) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Date".to_string(), out.first.clone(), out.second.clone()]);
    for record in price_records(out) {
        builder.push_record(record);
    }
    builder.build()
}

// -- Table output --

pub fn print_comparison_table(result: &ComparisonResult) {
    println!("{}", Table::new(build_return_rows(&result.entries)));
    println!(
        "Window: {} to {}",
        result.window.start(),
        result.window.end()
    );
    for line in availability_footnotes(&result.availability) {
        println!("{}", line);
    }
}

pub fn print_prices_table(out: &PricesOutput) {
    println!("{}", prices_table(out));
}

pub fn print_availability_table(availability: &[Availability]) {
    println!("{}", Table::new(build_availability_rows(availability)));
}

// -- Markdown output --

pub fn print_comparison_markdown(result: &ComparisonResult) {
    println!("{}", comparison_markdown(result));
}

pub fn print_prices_markdown(out: &PricesOutput) {
    let mut table = prices_table(out);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_availability_markdown(availability: &[Availability]) {
    let mut table = Table::new(build_availability_rows(availability));
    table.with(Style::markdown());
    println!("{}", table);
}

/// One heading per asset, best performer first. The heading level follows
/// the tier and the figure is colored by sign.
fn comparison_markdown(result: &ComparisonResult) -> String {
    let mut lines: Vec<String> = result
        .entries
        .iter()
        .map(|e| {
            format!(
                "{} {} Return: <b style='color:{};'>{}</b>",
                "#".repeat(e.heading_tier.rank() as usize),
                e.symbol,
                markup_color(e.color_class),
                format_percent(e.return_percent, e.color_class)
            )
        })
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "_Window: {} to {}_",
        result.window.start(),
        result.window.end()
    ));
    lines.extend(
        availability_footnotes(&result.availability)
            .into_iter()
            .map(|l| format!("_{}_", l)),
    );
    lines.join("\n")
}

fn markup_color(class: ReturnClass) -> &'static str {
    match class {
        ReturnClass::Positive => "green",
        ReturnClass::Negative => "red",
    }
}

fn availability_footnotes(availability: &[Availability]) -> Vec<String> {
    availability
        .iter()
        .map(|a| {
            format!(
                "{}: data available from {} to {} ({} prices)",
                a.symbol, a.min_date, a.max_date, a.points
            )
        })
        .collect()
}

// -- CSV output --

pub fn print_comparison_csv(result: &ComparisonResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_return_rows(&result.entries) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_prices_csv(out: &PricesOutput) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(["Date", out.first.as_str(), out.second.as_str()])?;
    for record in price_records(out) {
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_availability_csv(availability: &[Availability]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_availability_rows(availability) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- XML output --

pub fn print_comparison_xml(result: &ComparisonResult) -> Result<()> {
    println!("{}", xml_output::comparison_to_xml(result)?);
    Ok(())
}

pub fn print_prices_xml(out: &PricesOutput) -> Result<()> {
    println!("{}", xml_output::prices_to_xml(out)?);
    Ok(())
}

pub fn print_availability_xml(availability: &[Availability]) -> Result<()> {
    println!("{}", xml_output::availability_to_xml(availability)?);
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Two decimals with a percent sign. The sign follows `class`, so a small
/// negative return that rounds to zero still prints as `-0.00%`.
fn format_percent(value: f64, class: ReturnClass) -> String {
    let magnitude = format!("{:.2}%", value.abs());
    match class {
        ReturnClass::Negative => format!("-{}", magnitude),
        ReturnClass::Positive => magnitude,
    }
}

fn format_price(value: f64) -> String {
    if value >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.6}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use coinreturns_lib::{compare_series, AssetSeries, CompareOptions};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(symbol: &str, closes: &[f64]) -> AssetSeries {
        AssetSeries::from_raw(
            symbol,
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| (d(i as u32 + 1), Some(*c))),
        )
        .unwrap()
    }

    fn sample_result() -> ComparisonResult {
        let btc = series("BTC-USD", &[100.0, 175.4]);
        let eth = series("ETH-USD", &[100.0, 88.0]);
        let window = ComparisonWindow::new(d(1), d(2)).unwrap();
        compare_series(&btc, &eth, Some(window), &CompareOptions::default()).unwrap()
    }

    #[test]
    fn test_format_percent() {
        let fmt = |v: f64| format_percent(v, ReturnClass::from_return(v));
        assert_eq!(fmt(75.4), "75.40%");
        assert_eq!(fmt(-12.0), "-12.00%");
        assert_eq!(fmt(0.0), "0.00%");
        assert_eq!(fmt(-0.0), "0.00%");
        assert_eq!(fmt(-0.001), "-0.00%");
        assert_eq!(fmt(0.001), "0.00%");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(42280.234), "42280.23");
        assert_eq!(format_price(0.0000123), "0.000012");
    }

    #[test]
    fn test_build_return_rows_mapping() {
        let result = sample_result();
        let rows = build_return_rows(&result.entries);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "BTC-USD");
        assert_eq!(rows[0].return_percent, "75.40%");
        assert_eq!(rows[0].class, "positive");
        assert_eq!(rows[0].tier, 2);
        assert_eq!(rows[1].symbol, "ETH-USD");
        assert_eq!(rows[1].class, "negative");
        assert_eq!(rows[1].tier, 3);
        assert_eq!(rows[1].start_date, "2024-01-01");
    }

    #[test]
    fn test_comparison_markdown_headings() {
        let md = comparison_markdown(&sample_result());
        let mut lines = md.lines();
        assert_eq!(
            lines.next().unwrap(),
            "## BTC-USD Return: <b style='color:green;'>75.40%</b>"
        );
        assert_eq!(
            lines.next().unwrap(),
            "### ETH-USD Return: <b style='color:red;'>-12.00%</b>"
        );
        assert!(md.contains("_Window: 2024-01-01 to 2024-01-02_"));
        assert!(md.contains("_BTC-USD: data available from 2024-01-01 to 2024-01-02 (2 prices)_"));
    }

    #[test]
    fn test_tiny_loss_keeps_sign_and_red_markup() {
        let btc = series("BTC-USD", &[100_000.0, 99_999.0]);
        let eth = series("ETH-USD", &[100.0, 110.0]);
        let window = ComparisonWindow::new(d(1), d(2)).unwrap();
        let result = compare_series(&btc, &eth, Some(window), &CompareOptions::default()).unwrap();

        let rows = build_return_rows(&result.entries);
        assert_eq!(rows[1].symbol, "BTC-USD");
        assert_eq!(rows[1].return_percent, "-0.00%");
        assert_eq!(rows[1].class, "negative");

        let md = comparison_markdown(&result);
        assert!(md.contains("#### BTC-USD Return: <b style='color:red;'>-0.00%</b>"));
    }

    #[test]
    fn test_prices_table_uses_symbols_as_headers() {
        let out = PricesOutput {
            first: "BTC-USD".to_string(),
            second: "ETH-USD".to_string(),
            window: ComparisonWindow::new(d(1), d(2)).unwrap(),
            rows: vec![
                OverlayRow {
                    date: d(1),
                    first: Some(42280.23),
                    second: None,
                },
                OverlayRow {
                    date: d(2),
                    first: Some(44187.14),
                    second: Some(2270.0),
                },
            ],
        };
        let rendered = prices_table(&out).to_string();
        assert!(rendered.contains("BTC-USD"));
        assert!(rendered.contains("ETH-USD"));
        assert!(rendered.contains("42280.23"));

        let records = price_records(&out);
        assert_eq!(records[0], ["2024-01-01".to_string(), "42280.23".to_string(), String::new()]);
        assert_eq!(records[1][2], "2270.00");
    }

    // -- CSV output tests --

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_csv_return_headers() {
        let rows = build_return_rows(&sample_result().entries);
        let csv = csv_from_rows(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Symbol,Return,Class,Tier,From,To");
        assert_eq!(
            lines.next().unwrap(),
            "BTC-USD,75.40%,positive,2,2024-01-01,2024-01-02"
        );
    }

    #[test]
    fn test_csv_availability_headers() {
        let rows = build_availability_rows(&sample_result().availability);
        let csv = csv_from_rows(&rows);
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "Symbol,First Date,Last Date,Prices");
    }

    // -- JSON output tests --

    #[test]
    fn test_json_comparison_serializable() {
        let val = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(val["entries"].as_array().unwrap().len(), 2);
        assert_eq!(val["entries"][0]["heading_tier"], 2);
        assert_eq!(val["availability"][1]["symbol"], "ETH-USD");
    }
}

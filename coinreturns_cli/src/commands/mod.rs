pub mod availability;
pub mod compare;
pub mod prices;

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use coinreturns_lib::validation;
use coinreturns_lib::{ComparisonWindow, DEFAULT_WINDOW_DAYS};
use indicatif::{ProgressBar, ProgressStyle};

/// Window selection shared by the two-asset commands.
#[derive(Args)]
pub struct WindowArgs {
    /// Window start date (YYYY-MM-DD), clipped to the common data range
    #[arg(long)]
    pub from: Option<String>,

    /// Window end date (YYYY-MM-DD), clipped to the common data range
    #[arg(long)]
    pub to: Option<String>,

    /// Trailing days ending at the last common date, used when no --from/--to
    /// is given [default: COINRETURNS_DEFAULT_DAYS or 365]
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub days: Option<i64>,
}

impl WindowArgs {
    pub fn requested(&self) -> Result<Option<ComparisonWindow>> {
        Ok(validation::validate_window(
            self.from.as_deref(),
            self.to.as_deref(),
        )?)
    }

    pub fn default_days(&self) -> Result<i64> {
        let days = match self.days {
            Some(days) => days,
            None => std::env::var("COINRETURNS_DEFAULT_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(DEFAULT_WINDOW_DAYS),
        };
        Ok(validation::validate_days(days)?)
    }
}

/// Stderr spinner shown while price histories are fetched.
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

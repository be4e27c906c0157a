use chrono::NaiveDate;

use crate::error::CoinReturnsError;
use crate::returns::BoundaryLookup;
use crate::window::{ComparisonWindow, MAX_WINDOW_DAYS};

pub const MAX_SYMBOL_LENGTH: usize = 20;

/// Validate a ticker symbol: trim, uppercase, and allow only the characters
/// the chart feed uses (`A-Z`, `0-9`, `.`, `-`, `=`, `^`).
pub fn validate_symbol(input: &str) -> Result<String, CoinReturnsError> {
    let upper = input.trim().to_uppercase();
    if upper.is_empty() {
        return Err(CoinReturnsError::InvalidInput(
            "symbol is empty".to_string(),
        ));
    }
    if upper.len() > MAX_SYMBOL_LENGTH {
        return Err(CoinReturnsError::InvalidInput(format!(
            "symbol exceeds maximum length of {} characters",
            MAX_SYMBOL_LENGTH
        )));
    }
    if let Some(bad) = upper
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '=' | '^')))
    {
        return Err(CoinReturnsError::InvalidInput(format!(
            "invalid character '{}' in symbol '{}'",
            bad,
            input.trim()
        )));
    }
    Ok(upper)
}

/// Validate a pair of symbols to compare; both must be valid and distinct.
pub fn validate_pair(first: &str, second: &str) -> Result<(String, String), CoinReturnsError> {
    let first = validate_symbol(first)?;
    let second = validate_symbol(second)?;
    if first == second {
        return Err(CoinReturnsError::InvalidInput(format!(
            "cannot compare {} with itself",
            first
        )));
    }
    Ok((first, second))
}

/// Parse a date string in YYYY-MM-DD format.
///
/// Dates outside the available history, future ones included, are accepted;
/// windows built from them are clipped into the data domain.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoinReturnsError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        CoinReturnsError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Validate trailing window days: must be 1..=36500.
pub fn validate_days(days: i64) -> Result<i64, CoinReturnsError> {
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(CoinReturnsError::InvalidInput(format!(
            "days must be between 1 and {}, got {}",
            MAX_WINDOW_DAYS, days
        )));
    }
    Ok(days)
}

/// Build a window from optional `--from`/`--to` strings.
///
/// Returns `None` when neither bound is given. A missing bound is open
/// (earliest or latest representable date); both are clipped into the data
/// domain later.
pub fn validate_window(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<ComparisonWindow>, CoinReturnsError> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let start = from.map(parse_date).transpose()?.unwrap_or(NaiveDate::MIN);
    let end = to.map(parse_date).transpose()?.unwrap_or(NaiveDate::MAX);
    ComparisonWindow::new(start, end)
        .map(Some)
        .map_err(|_| {
            CoinReturnsError::InvalidInput(format!(
                "--from {} is after --to {}",
                start, end
            ))
        })
}

/// Validate a boundary lookup name: `as-of` (default) or `slice`.
pub fn validate_lookup(input: &str) -> Result<BoundaryLookup, CoinReturnsError> {
    input.trim().to_lowercase().parse().map_err(|_| {
        CoinReturnsError::InvalidInput(format!(
            "unknown lookup '{}'. Valid values: as-of, slice",
            input
        ))
    })
}

//! One request/response cycle of the comparison: domain, window, returns, order.
//!
//! [`compare_series`] is pure and cheap; the only expensive step (building
//! the series from fetched data) happens before it and is cached by symbol
//! in [`crate::client::CachedClient`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{resolve_domain, DateDomain};
use crate::error::AlignmentError;
use crate::ordering::order_by_return;
use crate::returns::{boundary_indices, windowed_return, BoundaryLookup, WindowedReturn};
use crate::series::AssetSeries;
use crate::window::{default_window, ComparisonWindow, DEFAULT_WINDOW_DAYS};

/// Knobs of a comparison that do not change per interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Trailing length of the window used when none is requested.
    pub default_days: i64,
    pub lookup: BoundaryLookup,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_WINDOW_DAYS,
            lookup: BoundaryLookup::default(),
        }
    }
}

/// How the window that was used differs from the one requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAdjustment {
    None,
    /// The request reached outside the common domain and was clipped.
    Clamped,
    /// The window held fewer than two points for some asset and was widened
    /// to the nearest available dates.
    Widened,
    /// Clipped into the domain first, then widened.
    ClampedAndWidened,
}

impl WindowAdjustment {
    pub fn is_clamped(&self) -> bool {
        matches!(self, Self::Clamped | Self::ClampedAndWidened)
    }

    pub fn is_widened(&self) -> bool {
        matches!(self, Self::Widened | Self::ClampedAndWidened)
    }

    fn widened(self) -> Self {
        if self.is_clamped() {
            Self::ClampedAndWidened
        } else {
            Self::Widened
        }
    }
}

/// Data-availability footnote for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    pub symbol: String,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub points: usize,
}

impl From<&AssetSeries> for Availability {
    fn from(series: &AssetSeries) -> Self {
        Self {
            symbol: series.symbol().to_string(),
            min_date: series.min_date(),
            max_date: series.max_date(),
            points: series.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Window the returns were computed over.
    pub window: ComparisonWindow,
    /// Window the caller asked for; `None` when the default was applied.
    pub requested: Option<ComparisonWindow>,
    pub domain: DateDomain,
    pub adjustment: WindowAdjustment,
    /// Sorted by return, descending; ties keep pairing order.
    pub entries: Vec<WindowedReturn>,
    /// In pairing order.
    pub availability: Vec<Availability>,
}

impl ComparisonResult {
    /// The best performer over the window.
    pub fn leader(&self) -> Option<&WindowedReturn> {
        self.entries.first()
    }

    pub fn entry(&self, symbol: &str) -> Option<&WindowedReturn> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }
}

/// Resolves the domain of the pair and picks the window to use: the default
/// trailing window when nothing was requested, otherwise the request clipped
/// into the domain.
pub fn resolve_window(
    first: &AssetSeries,
    second: &AssetSeries,
    requested: Option<ComparisonWindow>,
    default_days: i64,
) -> Result<(DateDomain, ComparisonWindow, WindowAdjustment), AlignmentError> {
    let domain = resolve_domain(&[first, second])?;
    Ok(match requested {
        None => (
            domain,
            default_window(&domain, default_days),
            WindowAdjustment::None,
        ),
        Some(req) => {
            let clamped = req.clamp_to(&domain);
            if clamped == req {
                (domain, req, WindowAdjustment::None)
            } else {
                tracing::debug!(
                    "window {}..{} clamped to {}..{}",
                    req.start(),
                    req.end(),
                    clamped.start(),
                    clamped.end()
                );
                (domain, clamped, WindowAdjustment::Clamped)
            }
        }
    })
}

/// Compares two assets over `requested` (or the default window).
///
/// An [`AlignmentError::EmptyWindow`] triggers one retry over a window
/// widened to the nearest dates outside it; a second failure is returned.
pub fn compare_series(
    first: &AssetSeries,
    second: &AssetSeries,
    requested: Option<ComparisonWindow>,
    options: &CompareOptions,
) -> Result<ComparisonResult, AlignmentError> {
    let (domain, window, mut adjustment) =
        resolve_window(first, second, requested, options.default_days)?;
    let pair = [first, second];

    let attempt: Vec<_> = pair
        .iter()
        .map(|s| windowed_return(s, &window, options.lookup))
        .collect();

    let (window, entries) = match first_error(&attempt) {
        None => (window, attempt.into_iter().flatten().collect()),
        Some(err @ AlignmentError::EmptyWindow { .. }) => {
            let failing: Vec<&AssetSeries> = pair
                .iter()
                .zip(&attempt)
                .filter(|(_, r)| matches!(r, Err(AlignmentError::EmptyWindow { .. })))
                .map(|(s, _)| *s)
                .collect();
            let widened = match widen_window(&failing, &window, &domain, options.lookup) {
                Some(w) => w,
                None => return Err(err),
            };
            tracing::debug!(
                "window {}..{} widened to {}..{}",
                window.start(),
                window.end(),
                widened.start(),
                widened.end()
            );
            adjustment = adjustment.widened();
            let entries = pair
                .iter()
                .map(|s| windowed_return(s, &widened, options.lookup))
                .collect::<Result<Vec<_>, _>>()?;
            (widened, entries)
        }
        Some(err) => return Err(err),
    };

    Ok(ComparisonResult {
        window,
        requested,
        domain,
        adjustment,
        entries: order_by_return(entries),
        availability: pair.iter().map(|s| Availability::from(*s)).collect(),
    })
}

fn first_error(results: &[Result<WindowedReturn, AlignmentError>]) -> Option<AlignmentError> {
    results.iter().find_map(|r| r.as_ref().err().cloned())
}

/// Widens `window` so every failing series resolves two distinct points.
///
/// The start moves back to the point just before the one the end bound
/// resolves to; when that point lies before the domain, the end moves forward
/// to the point just after the one the start bound resolves to. Returns
/// `None` when nothing inside `domain` can be reached.
fn widen_window(
    failing: &[&AssetSeries],
    window: &ComparisonWindow,
    domain: &DateDomain,
    lookup: BoundaryLookup,
) -> Option<ComparisonWindow> {
    let mut start = window.start();
    let mut end = window.end();
    for series in failing {
        let (start_idx, end_idx) = boundary_indices(series, window, lookup);
        let earlier = end_idx
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| series.price_at(i))
            .map(|p| p.date)
            .filter(|d| *d >= domain.min);
        match earlier {
            Some(d) => start = start.min(d),
            None => {
                let later = start_idx
                    .and_then(|i| series.price_at(i + 1))
                    .map(|p| p.date)
                    .filter(|d| *d <= domain.max);
                if let Some(d) = later {
                    end = end.max(d);
                }
            }
        }
    }
    let widened = ComparisonWindow::new(start, end).ok()?;
    (widened != *window).then_some(widened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::returns::{HeadingTier, ReturnClass};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(symbol: &str, rows: &[(u32, f64)]) -> AssetSeries {
        AssetSeries::from_raw(symbol, rows.iter().map(|(day, c)| (d(*day), Some(*c)))).unwrap()
    }

    fn window(from: u32, to: u32) -> Option<ComparisonWindow> {
        Some(ComparisonWindow::new(d(from), d(to)).unwrap())
    }

    #[test]
    fn orders_by_return_and_reports_window() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 105.0), (3, 110.0)]);
        let eth = series("ETH-USD", &[(1, 10.0), (2, 13.0), (3, 16.0)]);
        let result = compare_series(&btc, &eth, window(1, 3), &CompareOptions::default()).unwrap();

        assert_eq!(result.adjustment, WindowAdjustment::None);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.leader().unwrap().symbol, "ETH-USD");
        assert_eq!(result.entries[1].symbol, "BTC-USD");
        let eth_entry = result.entry("ETH-USD").unwrap();
        assert_eq!(eth_entry.color_class, ReturnClass::Positive);
        assert_eq!(eth_entry.heading_tier, HeadingTier::Tier2);
        assert_eq!(result.availability[0].symbol, "BTC-USD");
    }

    #[test]
    fn no_window_uses_default_policy() {
        let btc = series("BTC-USD", &[(1, 100.0), (10, 105.0), (20, 110.0)]);
        let eth = series("ETH-USD", &[(5, 10.0), (15, 13.0), (25, 16.0)]);
        let options = CompareOptions {
            default_days: 7,
            ..CompareOptions::default()
        };
        let result = compare_series(&btc, &eth, None, &options).unwrap();
        assert_eq!(result.domain, DateDomain { min: d(5), max: d(20) });
        assert_eq!(result.window, ComparisonWindow::new(d(13), d(20)).unwrap());
        assert!(result.requested.is_none());
    }

    #[test]
    fn wide_request_is_clamped_silently() {
        let btc = series("BTC-USD", &[(3, 100.0), (4, 101.0), (5, 102.0)]);
        let eth = series("ETH-USD", &[(1, 10.0), (4, 11.0), (9, 12.0)]);
        let result = compare_series(&btc, &eth, window(1, 31), &CompareOptions::default()).unwrap();
        assert_eq!(result.adjustment, WindowAdjustment::Clamped);
        assert_eq!(result.window, ComparisonWindow::new(d(3), d(5)).unwrap());
        assert_eq!(result.requested, window(1, 31));
    }

    #[test]
    fn disjoint_histories_fail() {
        let btc = series("BTC-USD", &[(1, 100.0), (5, 101.0)]);
        let eth = series("ETH-USD", &[(10, 10.0), (20, 11.0)]);
        let err = compare_series(&btc, &eth, None, &CompareOptions::default()).unwrap_err();
        assert!(matches!(err, AlignmentError::NoOverlap { .. }));
    }

    #[test]
    fn single_day_window_is_widened_once() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 110.0), (3, 121.0)]);
        let eth = series("ETH-USD", &[(1, 10.0), (2, 12.0), (3, 11.0)]);
        let result = compare_series(&btc, &eth, window(3, 3), &CompareOptions::default()).unwrap();
        assert_eq!(result.adjustment, WindowAdjustment::Widened);
        assert_eq!(result.window, ComparisonWindow::new(d(2), d(3)).unwrap());
        let btc_entry = result.entry("BTC-USD").unwrap();
        assert!((btc_entry.return_percent - 10.0).abs() < 1e-9);
    }

    fn daily(symbol: &str, days: std::ops::RangeInclusive<u32>) -> AssetSeries {
        AssetSeries::from_raw(symbol, days.map(|day| (d(day), Some(10.0 + day as f64)))).unwrap()
    }

    #[test]
    fn gap_inside_window_is_widened_past_the_gap() {
        // BTC has no prices between the 3rd and the 10th.
        let btc = series("BTC-USD", &[(1, 100.0), (3, 110.0), (10, 120.0)]);
        let eth = daily("ETH-USD", 1..=10);

        for lookup in [BoundaryLookup::AsOf, BoundaryLookup::Slice] {
            let options = CompareOptions {
                lookup,
                ..CompareOptions::default()
            };
            let result = compare_series(&btc, &eth, window(4, 8), &options).unwrap();
            assert_eq!(result.adjustment, WindowAdjustment::Widened, "{}", lookup);
            assert_eq!(result.window, ComparisonWindow::new(d(1), d(8)).unwrap());
            let btc_entry = result.entry("BTC-USD").unwrap();
            assert_eq!(btc_entry.start_date, d(1), "{}", lookup);
            assert_eq!(btc_entry.end_date, d(3), "{}", lookup);
            assert!((btc_entry.return_percent - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn widening_moves_end_forward_when_start_is_at_domain_edge() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 100.0), (5, 150.0), (6, 160.0)]);
        let eth = daily("ETH-USD", 3..=6);
        let result = compare_series(&btc, &eth, window(3, 4), &CompareOptions::default()).unwrap();
        assert_eq!(result.adjustment, WindowAdjustment::Widened);
        assert_eq!(result.window, ComparisonWindow::new(d(3), d(5)).unwrap());
        let btc_entry = result.entry("BTC-USD").unwrap();
        assert_eq!(btc_entry.end_date, d(5));
        assert!((btc_entry.return_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_is_kept_when_window_is_also_widened() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 100.0), (5, 150.0), (6, 160.0)]);
        let eth = daily("ETH-USD", 3..=6);
        let result = compare_series(&btc, &eth, window(1, 4), &CompareOptions::default()).unwrap();
        assert_eq!(result.adjustment, WindowAdjustment::ClampedAndWidened);
        assert!(result.adjustment.is_clamped());
        assert!(result.adjustment.is_widened());
        assert_eq!(result.window, ComparisonWindow::new(d(3), d(5)).unwrap());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["adjustment"], "clamped_and_widened");
    }

    #[test]
    fn one_day_domain_cannot_be_widened() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 110.0)]);
        let eth = series("ETH-USD", &[(2, 10.0), (3, 12.0)]);
        let err = compare_series(&btc, &eth, None, &CompareOptions::default()).unwrap_err();
        assert!(matches!(err, AlignmentError::EmptyWindow { .. }));
    }

    #[test]
    fn single_point_series_is_insufficient() {
        let btc = series("BTC-USD", &[(2, 100.0)]);
        let eth = series("ETH-USD", &[(1, 10.0), (2, 12.0), (3, 11.0)]);
        let err = compare_series(&btc, &eth, None, &CompareOptions::default()).unwrap_err();
        assert_eq!(
            err,
            AlignmentError::InsufficientData {
                symbol: "BTC-USD".to_string(),
                points: 1
            }
        );
    }

    #[test]
    fn result_serializes_with_lowercase_enums() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 50.0)]);
        let eth = series("ETH-USD", &[(1, 10.0), (2, 11.0)]);
        let result = compare_series(&btc, &eth, window(1, 2), &CompareOptions::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["adjustment"], "none");
        assert_eq!(json["window"]["start"], "2024-01-01");
        assert_eq!(json["entries"][0]["symbol"], "ETH-USD");
        assert_eq!(json["entries"][1]["color_class"], "negative");
        assert_eq!(json["entries"][1]["heading_tier"], 2);
    }
}

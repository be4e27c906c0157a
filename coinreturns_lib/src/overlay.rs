//! Raw closing prices of two assets aligned on one date axis.

use chrono::NaiveDate;
use serde::Serialize;

use crate::series::AssetSeries;
use crate::window::ComparisonWindow;

/// One date of the overlay. A side is `None` when that asset has no close
/// on the date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayRow {
    pub date: NaiveDate,
    pub first: Option<f64>,
    pub second: Option<f64>,
}

/// Merges the closes of both series inside `window` on the union of their dates.
pub fn price_overlay(
    first: &AssetSeries,
    second: &AssetSeries,
    window: &ComparisonWindow,
) -> Vec<OverlayRow> {
    let a = first.prices_between(window.start(), window.end());
    let b = second.prices_between(window.start(), window.end());
    let mut rows = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        let row = match (a.get(i), b.get(j)) {
            (Some(pa), Some(pb)) if pa.date == pb.date => {
                i += 1;
                j += 1;
                OverlayRow {
                    date: pa.date,
                    first: Some(pa.close),
                    second: Some(pb.close),
                }
            }
            (Some(pa), Some(pb)) if pa.date < pb.date => {
                i += 1;
                OverlayRow {
                    date: pa.date,
                    first: Some(pa.close),
                    second: None,
                }
            }
            (Some(pa), None) => {
                i += 1;
                OverlayRow {
                    date: pa.date,
                    first: Some(pa.close),
                    second: None,
                }
            }
            (_, Some(pb)) => {
                j += 1;
                OverlayRow {
                    date: pb.date,
                    first: None,
                    second: Some(pb.close),
                }
            }
            (None, None) => break,
        };
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(symbol: &str, rows: &[(u32, f64)]) -> AssetSeries {
        AssetSeries::from_raw(symbol, rows.iter().map(|(day, c)| (d(*day), Some(*c)))).unwrap()
    }

    #[test]
    fn union_of_dates_in_order() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 101.0), (4, 104.0)]);
        let eth = series("ETH-USD", &[(2, 10.0), (3, 11.0), (4, 12.0)]);
        let rows = price_overlay(&btc, &eth, &ComparisonWindow::new(d(1), d(4)).unwrap());

        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(1), d(2), d(3), d(4)]);
        assert_eq!(rows[0].second, None);
        assert_eq!(rows[1].first, Some(101.0));
        assert_eq!(rows[1].second, Some(10.0));
        assert_eq!(rows[2].first, None);
        assert_eq!(rows[3].second, Some(12.0));
    }

    #[test]
    fn window_limits_rows() {
        let btc = series("BTC-USD", &[(1, 100.0), (2, 101.0), (3, 102.0), (4, 104.0)]);
        let eth = series("ETH-USD", &[(1, 10.0), (2, 11.0), (3, 12.0), (4, 13.0)]);
        let rows = price_overlay(&btc, &eth, &ComparisonWindow::new(d(2), d(3)).unwrap());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.first.is_some() && r.second.is_some()));
    }

    #[test]
    fn empty_window_yields_no_rows() {
        let btc = series("BTC-USD", &[(1, 100.0)]);
        let eth = series("ETH-USD", &[(1, 10.0)]);
        let rows = price_overlay(&btc, &eth, &ComparisonWindow::new(d(5), d(6)).unwrap());
        assert!(rows.is_empty());
    }
}

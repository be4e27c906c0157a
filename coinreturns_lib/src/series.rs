//! Validated price history of one asset plus its cumulative return series.
//!
//! An [`AssetSeries`] is built once per fetch and never mutated afterwards,
//! so it can be shared through the symbol cache behind an `Arc`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use coinreturns_api::types::DailyClose;
use serde::Serialize;

use crate::error::AlignmentError;

/// One cleaned daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Cumulative return at a date, in percent, anchored at the first price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub percent: f64,
}

/// Price history of a single asset, strictly increasing by date.
///
/// `prices` and `cumulative` always share the same date index. The first
/// cumulative value is `0.0`; the series only exposes returns once it holds
/// at least two prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSeries {
    symbol: String,
    prices: Vec<PricePoint>,
    cumulative: Vec<ReturnPoint>,
}

impl AssetSeries {
    /// Builds a series from raw `(date, close)` rows in any order.
    ///
    /// Rows without a price are dropped, never interpolated. Non-finite and
    /// non-positive closes count as missing since they cannot anchor a
    /// percentage change. When a date repeats, the last valid row wins.
    pub fn from_raw<I>(symbol: &str, rows: I) -> Result<Self, AlignmentError>
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut dropped = 0usize;
        for (date, close) in rows {
            match close.filter(|c| c.is_finite() && *c > 0.0) {
                Some(close) => {
                    by_date.insert(date, close);
                }
                None => dropped += 1,
            }
        }

        if by_date.is_empty() {
            return Err(AlignmentError::EmptyData {
                symbol: symbol.to_string(),
            });
        }
        if dropped > 0 {
            tracing::debug!("{}: dropped {} rows without a usable close", symbol, dropped);
        }

        let prices: Vec<PricePoint> = by_date
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        let cumulative = cumulative_returns(&prices);

        Ok(Self {
            symbol: symbol.to_string(),
            prices,
            cumulative,
        })
    }

    /// Builds a series from the chart client's daily rows.
    pub fn from_daily_closes(symbol: &str, closes: &[DailyClose]) -> Result<Self, AlignmentError> {
        Self::from_raw(symbol, closes.iter().map(|c| (c.date, c.close)))
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn prices(&self) -> &[PricePoint] {
        &self.prices
    }

    /// Number of cleaned price points. Always at least 1.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether a return can be computed at all (two or more prices).
    pub fn has_returns(&self) -> bool {
        self.prices.len() >= 2
    }

    /// Cumulative return series, or `None` for a single-point series.
    pub fn cumulative_return(&self) -> Option<&[ReturnPoint]> {
        if self.has_returns() {
            Some(&self.cumulative)
        } else {
            None
        }
    }

    pub fn min_date(&self) -> NaiveDate {
        self.prices[0].date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.prices[self.prices.len() - 1].date
    }

    /// Index of the last point dated on or before `date`.
    pub fn index_as_of(&self, date: NaiveDate) -> Option<usize> {
        self.prices
            .partition_point(|p| p.date <= date)
            .checked_sub(1)
    }

    /// Index of the first point dated on or after `date`.
    pub fn index_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.prices.partition_point(|p| p.date < date);
        (idx < self.prices.len()).then_some(idx)
    }

    pub fn price_at(&self, idx: usize) -> Option<&PricePoint> {
        self.prices.get(idx)
    }

    /// Cumulative return at an index; `None` out of range or for a single-point series.
    pub fn return_at(&self, idx: usize) -> Option<&ReturnPoint> {
        self.cumulative_return()?.get(idx)
    }

    pub fn price_as_of(&self, date: NaiveDate) -> Option<f64> {
        self.index_as_of(date).map(|i| self.prices[i].close)
    }

    pub fn return_as_of(&self, date: NaiveDate) -> Option<f64> {
        self.index_as_of(date)
            .and_then(|i| self.return_at(i))
            .map(|r| r.percent)
    }

    /// Prices dated within `[start, end]`, inclusive.
    pub fn prices_between(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        let lo = self.prices.partition_point(|p| p.date < start);
        let hi = self.prices.partition_point(|p| p.date <= end);
        if lo >= hi {
            &[]
        } else {
            &self.prices[lo..hi]
        }
    }
}

/// Running sum of day-over-day fractional changes, scaled to percent.
fn cumulative_returns(prices: &[PricePoint]) -> Vec<ReturnPoint> {
    let mut running = 0.0;
    let mut out = Vec::with_capacity(prices.len());
    for (i, point) in prices.iter().enumerate() {
        if i > 0 {
            let prev = prices[i - 1].close;
            running += (point.close - prev) / prev;
        }
        out.push(ReturnPoint {
            date: point.date,
            percent: running * 100.0,
        });
    }
    out
}

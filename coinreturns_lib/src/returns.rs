//! Windowed return of one asset, with its sign class and heading tier.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::AlignmentError;
use crate::series::AssetSeries;
use crate::window::ComparisonWindow;

/// Sign class of a return. Exactly zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnClass {
    Positive,
    Negative,
}

impl ReturnClass {
    pub fn from_return(percent: f64) -> Self {
        if percent < 0.0 {
            ReturnClass::Negative
        } else {
            ReturnClass::Positive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnClass::Positive => "positive",
            ReturnClass::Negative => "negative",
        }
    }
}

impl fmt::Display for ReturnClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display emphasis for a return, `Tier1` being the most prominent.
/// Serialized as its rank (1..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

/// Absolute-return thresholds, checked from the top; the first match wins.
const TIER_THRESHOLDS: [(f64, HeadingTier); 3] = [
    (100.0, HeadingTier::Tier1),
    (50.0, HeadingTier::Tier2),
    (10.0, HeadingTier::Tier3),
];

impl HeadingTier {
    pub fn from_return(percent: f64) -> Self {
        let magnitude = percent.abs();
        TIER_THRESHOLDS
            .iter()
            .find(|(threshold, _)| magnitude >= *threshold)
            .map_or(HeadingTier::Tier4, |(_, tier)| *tier)
    }

    pub fn rank(&self) -> u8 {
        match self {
            HeadingTier::Tier1 => 1,
            HeadingTier::Tier2 => 2,
            HeadingTier::Tier3 => 3,
            HeadingTier::Tier4 => 4,
        }
    }
}

impl Serialize for HeadingTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.rank())
    }
}

/// How window bounds are matched against a series' dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryLookup {
    /// Start at the last date on or before `start` (or the first date after it
    /// when the series begins later); end at the last date on or before `end`.
    #[default]
    AsOf,
    /// Label slicing: first date on or after `start`, last date on or before `end`.
    Slice,
}

impl fmt::Display for BoundaryLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryLookup::AsOf => write!(f, "as-of"),
            BoundaryLookup::Slice => write!(f, "slice"),
        }
    }
}

impl FromStr for BoundaryLookup {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "as-of" | "asof" => Ok(BoundaryLookup::AsOf),
            "slice" | "exact" => Ok(BoundaryLookup::Slice),
            _ => Err(()),
        }
    }
}

/// Return of one asset over a window. Recomputed on every window change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowedReturn {
    pub symbol: String,
    /// Series date the start value was read from.
    pub start_date: NaiveDate,
    /// Series date the end value was read from.
    pub end_date: NaiveDate,
    pub return_percent: f64,
    pub color_class: ReturnClass,
    pub heading_tier: HeadingTier,
}

/// Series indices the window's start and end resolve to under `lookup`.
pub(crate) fn boundary_indices(
    series: &AssetSeries,
    window: &ComparisonWindow,
    lookup: BoundaryLookup,
) -> (Option<usize>, Option<usize>) {
    let start = match lookup {
        BoundaryLookup::AsOf => series
            .index_as_of(window.start())
            .or_else(|| series.index_on_or_after(window.start())),
        BoundaryLookup::Slice => series.index_on_or_after(window.start()),
    };
    (start, series.index_as_of(window.end()))
}

/// Cumulative-return difference of `series` between the window bounds.
///
/// Fails with [`AlignmentError::InsufficientData`] for a single-point series
/// and [`AlignmentError::EmptyWindow`] when the bounds resolve to fewer than
/// two distinct points.
pub fn windowed_return(
    series: &AssetSeries,
    window: &ComparisonWindow,
    lookup: BoundaryLookup,
) -> Result<WindowedReturn, AlignmentError> {
    if !series.has_returns() {
        return Err(AlignmentError::InsufficientData {
            symbol: series.symbol().to_string(),
            points: series.len(),
        });
    }
    let empty = || AlignmentError::EmptyWindow {
        symbol: series.symbol().to_string(),
        start: window.start(),
        end: window.end(),
    };

    let (start_idx, end_idx) = boundary_indices(series, window, lookup);
    let start_idx = start_idx.ok_or_else(empty)?;
    let end_idx = end_idx.ok_or_else(empty)?;
    if start_idx >= end_idx {
        return Err(empty());
    }

    let start = series.return_at(start_idx).ok_or_else(empty)?;
    let end = series.return_at(end_idx).ok_or_else(empty)?;
    let return_percent = end.percent - start.percent;

    Ok(WindowedReturn {
        symbol: series.symbol().to_string(),
        start_date: start.date,
        end_date: end.date,
        return_percent,
        color_class: ReturnClass::from_return(return_percent),
        heading_tier: HeadingTier::from_return(return_percent),
    })
}

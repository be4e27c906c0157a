//! Common valid date range across several series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AlignmentError;
use crate::series::AssetSeries;

/// Inclusive date range over which every participating series has data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateDomain {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateDomain {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Pulls `date` into the domain.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.min, self.max)
    }

    /// Number of calendar days between the bounds.
    pub fn span_days(&self) -> i64 {
        (self.max - self.min).num_days()
    }
}

/// Intersects the date ranges of `series`: latest first date to earliest last date.
///
/// Fails with [`AlignmentError::NoOverlap`] when the ranges do not intersect.
/// The result does not depend on the order of `series`.
pub fn resolve_domain(series: &[&AssetSeries]) -> Result<DateDomain, AlignmentError> {
    let latest_start = series
        .iter()
        .map(|s| s.min_date())
        .max()
        .ok_or(AlignmentError::NoSeries)?;
    let earliest_end = series
        .iter()
        .map(|s| s.max_date())
        .min()
        .ok_or(AlignmentError::NoSeries)?;

    if latest_start > earliest_end {
        return Err(AlignmentError::NoOverlap {
            latest_start,
            earliest_end,
        });
    }
    Ok(DateDomain {
        min: latest_start,
        max: earliest_end,
    })
}

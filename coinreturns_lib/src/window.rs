//! Selected comparison window and the default trailing-window policy.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::DateDomain;
use crate::error::AlignmentError;

/// Trailing length of the window shown before the user picks one.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Longest trailing window accepted, roughly a century of daily bars.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Inclusive `[start, end]` date selection. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ComparisonWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AlignmentError> {
        if start > end {
            return Err(AlignmentError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clips both bounds into `domain`. A selection wider than the domain is
    /// narrowed silently; ordering of the bounds survives because clamping is
    /// monotonic.
    pub fn clamp_to(&self, domain: &DateDomain) -> Self {
        Self {
            start: domain.clamp(self.start),
            end: domain.clamp(self.end),
        }
    }
}

/// Trailing `days` ending at the domain's last date, clipped to its first date.
pub fn default_window(domain: &DateDomain, days: i64) -> ComparisonWindow {
    let days = days.clamp(0, MAX_WINDOW_DAYS);
    let start = domain
        .max
        .checked_sub_signed(Duration::days(days))
        .map_or(domain.min, |d| d.max(domain.min));
    ComparisonWindow {
        start,
        end: domain.max,
    }
}

//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields,
//! and the [`ChartRange`] / [`Interval`] parameter enums.

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for the lookback range and bar interval.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets how far back the history reaches (e.g. `1y`, `max`).
    fn with_range(mut self, range: ChartRange) -> Self
    where
        Self: Sized,
    {
        self.get_common().range = range;
        self
    }

    /// Sets the bar size of the returned series.
    fn with_interval(mut self, interval: Interval) -> Self
    where
        Self: Sized,
    {
        self.get_common().interval = interval;
        self
    }
}

/// Lookback range accepted by the chart endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    /// Full available history. This is the default.
    #[default]
    Max,
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
            ChartRange::TenYears => "10y",
            ChartRange::YearToDate => "ytd",
            ChartRange::Max => "max",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ChartRange {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1mo" => Ok(ChartRange::OneMonth),
            "3mo" => Ok(ChartRange::ThreeMonths),
            "6mo" => Ok(ChartRange::SixMonths),
            "1y" => Ok(ChartRange::OneYear),
            "2y" => Ok(ChartRange::TwoYears),
            "5y" => Ok(ChartRange::FiveYears),
            "10y" => Ok(ChartRange::TenYears),
            "ytd" => Ok(ChartRange::YearToDate),
            "max" => Ok(ChartRange::Max),
            _ => Err(()),
        }
    }
}

/// Bar interval. Only end-of-period granularities are exposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interval {
    /// One bar per day. This is the default.
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Interval {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Interval::OneDay),
            "1wk" => Ok(Interval::OneWeek),
            "1mo" => Ok(Interval::OneMonth),
            _ => Err(()),
        }
    }
}

/// Fields shared by all query types: lookback range and bar interval.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCommon {
    /// Lookback range. Defaults to the full history.
    pub range: ChartRange,
    /// Bar interval. Defaults to daily.
    pub interval: Interval,
}

impl QueryCommon {
    /// Appends the range and interval parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("range", &self.range.to_string())
            .append_pair("interval", &self.interval.to_string());
        url
    }
}

//! Error types for the library layer.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Failures of the alignment and return engine. Every variant is a value the
/// renderer can show; none of them is turned into a fabricated zero return.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("no usable price data for {symbol}")]
    EmptyData { symbol: String },
    #[error("price histories do not overlap: latest first date {latest_start} is after earliest last date {earliest_end}")]
    NoOverlap {
        latest_start: NaiveDate,
        earliest_end: NaiveDate,
    },
    #[error("{symbol} has fewer than 2 distinct prices between {start} and {end}")]
    EmptyWindow {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{symbol} has {points} price point(s); at least 2 are needed for a return")]
    InsufficientData { symbol: String, points: usize },
    #[error("window start {start} is after window end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("no series supplied")]
    NoSeries,
}

/// Errors produced by the library layer, wrapping fetch errors and engine
/// errors and adding input validation failures.
#[derive(Debug)]
pub enum CoinReturnsError {
    /// An error from the underlying chart API client.
    Api(coinreturns_api::Error),
    /// The engine could not align or compute returns for the fetched data.
    Alignment(AlignmentError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl CoinReturnsError {
    /// True for the conditions shown to the user as "data not available":
    /// no usable rows, no common date range, or a symbol the feed has no data for.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Alignment(AlignmentError::EmptyData { .. })
                | Self::Alignment(AlignmentError::NoOverlap { .. })
                | Self::Api(coinreturns_api::Error::NoData { .. })
                | Self::Api(coinreturns_api::Error::Upstream { .. })
        )
    }
}

impl fmt::Display for CoinReturnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Alignment(e) => write!(f, "Comparison error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CoinReturnsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Alignment(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<coinreturns_api::Error> for CoinReturnsError {
    fn from(e: coinreturns_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<AlignmentError> for CoinReturnsError {
    fn from(e: AlignmentError) -> Self {
        Self::Alignment(e)
    }
}

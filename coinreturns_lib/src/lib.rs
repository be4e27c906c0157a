//! Library layer for coinreturns: price series, window alignment, and return comparison.
//!
//! Wraps the `coinreturns_api` chart client with an in-memory TTL cache of
//! validated series, retry with backoff, input validation, and the pure
//! comparison engine (domain resolution, default window, windowed returns,
//! presentation ordering).

pub mod cache;
pub mod client;
pub mod compare;
pub mod domain;
pub mod error;
pub mod ordering;
pub mod overlay;
pub mod returns;
pub mod series;
pub mod validation;
pub mod window;

pub use coinreturns_api;
pub use coinreturns_api::types;
pub use coinreturns_api::{ChartQuery, ChartRange, Interval, Query};

pub use cache::MemoryCache;
pub use client::CachedClient;
pub use compare::{
    compare_series, resolve_window, Availability, CompareOptions, ComparisonResult,
    WindowAdjustment,
};
pub use domain::{resolve_domain, DateDomain};
pub use error::{AlignmentError, CoinReturnsError};
pub use ordering::order_by_return;
pub use overlay::{price_overlay, OverlayRow};
pub use returns::{windowed_return, BoundaryLookup, HeadingTier, ReturnClass, WindowedReturn};
pub use series::{AssetSeries, PricePoint, ReturnPoint};
pub use window::{default_window, ComparisonWindow, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

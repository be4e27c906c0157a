//! Caching and retrying wrapper around the chart client.

use std::sync::Arc;
use std::time::Duration;

use coinreturns_api::Client;
use rand::Rng;

use crate::cache::MemoryCache;
use crate::compare::{compare_series, resolve_window, CompareOptions, ComparisonResult};
use crate::error::CoinReturnsError;
use crate::overlay::{price_overlay, OverlayRow};
use crate::series::AssetSeries;
use crate::window::ComparisonWindow;

/// Chart client wrapper that turns fetched history into cached [`AssetSeries`].
///
/// Building a series is the only expensive step of a comparison, so it is
/// done once per symbol and shared through the cache; every comparison after
/// that is a pure computation over the cached series.
pub struct CachedClient {
    inner: Client,
    cache: MemoryCache<Arc<AssetSeries>>,
    retry: RetryConfig,
}

#[derive(Debug, Clone, Copy)]
struct RetryConfig {
    max_retries: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryConfig {
    fn from_env() -> Self {
        Self {
            max_retries: env_usize("COINRETURNS_RETRY_MAX", 3),
            base_delay_ms: env_u64("COINRETURNS_RETRY_BASE_MS", 2000),
            max_delay_ms: env_u64("COINRETURNS_RETRY_MAX_MS", 30000),
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl CachedClient {
    /// Creates a new cached client using the production chart URL, or
    /// `COINRETURNS_BASE_URL` when it is set.
    pub fn new(cache: MemoryCache<Arc<AssetSeries>>) -> Self {
        let inner = match std::env::var("COINRETURNS_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => Client::with_base_url(url.trim()),
            _ => Client::new(),
        };
        Self {
            inner,
            cache,
            retry: RetryConfig::from_env(),
        }
    }

    /// Creates a new cached client with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str, cache: MemoryCache<Arc<AssetSeries>>) -> Self {
        Self {
            inner: Client::with_base_url(base_url),
            cache,
            retry: RetryConfig::from_env(),
        }
    }

    /// Overrides the retry policy read from the environment.
    pub fn with_retry_policy(mut self, max_retries: usize, base_delay: Duration, max_delay: Duration) -> Self {
        self.retry = RetryConfig {
            max_retries,
            base_delay_ms: base_delay.as_millis() as u64,
            max_delay_ms: max_delay.as_millis() as u64,
        };
        self
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, CoinReturnsError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoinReturnsError>>,
    {
        let cfg = self.retry;
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > cfg.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = cfg.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        cfg.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Returns the validated series for `symbol`, fetching it on a cache miss.
    pub async fn series(&self, symbol: &str) -> Result<Arc<AssetSeries>, CoinReturnsError> {
        if let Some(cached) = self.cache.get(symbol) {
            tracing::debug!("{}: series cache hit", symbol);
            return Ok(cached);
        }

        tracing::debug!("{}: series cache miss, fetching history", symbol);
        let closes = self
            .with_retry(symbol, || async move {
                Ok(self.inner.get_daily_closes(symbol).await?)
            })
            .await?;
        let series = Arc::new(AssetSeries::from_daily_closes(symbol, &closes)?);
        tracing::info!(
            "{}: {} daily closes from {} to {}",
            symbol,
            series.len(),
            series.min_date(),
            series.max_date()
        );
        self.cache.set(symbol.to_string(), Arc::clone(&series));
        Ok(series)
    }

    /// Fetches (or reuses) both series and compares them over `requested`,
    /// or over the default window when `None`.
    pub async fn compare(
        &self,
        first: &str,
        second: &str,
        requested: Option<ComparisonWindow>,
        options: &CompareOptions,
    ) -> Result<ComparisonResult, CoinReturnsError> {
        let (a, b) = tokio::try_join!(self.series(first), self.series(second))?;
        Ok(compare_series(&a, &b, requested, options)?)
    }

    /// Closing prices of both symbols over the resolved window, on a shared date axis.
    pub async fn overlay(
        &self,
        first: &str,
        second: &str,
        requested: Option<ComparisonWindow>,
        default_days: i64,
    ) -> Result<(ComparisonWindow, Vec<OverlayRow>), CoinReturnsError> {
        let (a, b) = tokio::try_join!(self.series(first), self.series(second))?;
        let (_, window, _) = resolve_window(&a, &b, requested, default_days)?;
        Ok((window, price_overlay(&a, &b, &window)))
    }

    /// Removes all cached series.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn is_retryable(err: &CoinReturnsError) -> bool {
    match err {
        CoinReturnsError::Api(api_err) => match api_err {
            coinreturns_api::Error::RequestFailed => true,
            coinreturns_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            coinreturns_api::Error::Upstream { .. } | coinreturns_api::Error::NoData { .. } => false,
        },
        _ => false,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

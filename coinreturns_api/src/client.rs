//! HTTP client for the Yahoo Finance chart API.

use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::{
    query::{ChartQuery, Query},
    types::{ChartResponse, DailyClose},
    user_agent::get_user_agent,
    Error,
};

/// HTTP client for the chart API.
///
/// Sends requests with browser-like headers and a randomized user agent.
/// Each request builds a fresh `reqwest::Client` with a 30-second timeout.
pub struct Client {
    /// Base URL for the API. Defaults to `https://query1.finance.yahoo.com`.
    base_api_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production chart API.
    pub fn new() -> Self {
        Self {
            base_api_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_url(&self, query: &ChartQuery) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::RequestFailed
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL cannot carry a path: {}", self.base_api_url);
                Error::RequestFailed
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", query.symbol.as_str()]);
        Ok(query.add_to_url(&url))
    }

    async fn get_body(&self, url: Url) -> Result<(StatusCode, String), Error> {
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;
        Ok((status, body))
    }

    /// Fetches the raw chart payload for the query.
    ///
    /// The endpoint reports unknown symbols as a 404 whose body still holds a
    /// chart error object; that case maps to [`Error::Upstream`] rather than
    /// a bare status error.
    pub async fn get_chart(&self, query: &ChartQuery) -> Result<ChartResponse, Error> {
        let url = self.get_url(query)?;
        tracing::debug!("GET {}", url);
        let (status, body) = self.get_body(url).await?;

        if !status.is_success() {
            if let Ok(resp) = serde_json::from_str::<ChartResponse>(&body) {
                if let Some(err) = resp.chart.error {
                    tracing::error!("Chart API error for {}: {}", query.symbol, err.description);
                    return Err(Error::Upstream {
                        code: err.code,
                        description: err.description,
                    });
                }
            }
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<ChartResponse>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        if let Some(err) = parsed.chart.error {
            return Err(Error::Upstream {
                code: err.code,
                description: err.description,
            });
        }
        Ok(parsed)
    }

    /// Fetches the full daily close history of `symbol`.
    ///
    /// Rows with a blank close are kept as `close: None`.
    pub async fn get_daily_closes(&self, symbol: &str) -> Result<Vec<DailyClose>, Error> {
        let resp = self.get_chart(&ChartQuery::new(symbol)).await?;
        let closes = resp
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|result| result.daily_closes())
            .unwrap_or_default();
        if closes.is_empty() {
            return Err(Error::NoData {
                symbol: symbol.to_string(),
            });
        }
        tracing::debug!("{}: {} daily rows", symbol, closes.len());
        Ok(closes)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

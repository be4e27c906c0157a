//! Error types for the chart API client.

/// Errors that can occur when fetching price history.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unparseable response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The chart endpoint answered with its own error object (unknown symbol, bad range).
    #[error("Chart API error {code}: {description}")]
    Upstream { code: String, description: String },
    /// The response parsed but carried no price rows for the symbol.
    #[error("No price data returned for {symbol}")]
    NoData { symbol: String },
}

//! Quote source adapters
//!
//! A quote source turns a ticker and a lookback period into the most recent
//! closing price. Everything provider-specific stays behind [`QuoteSource`].

pub mod yahoo;

use crate::error::{AppError, Result};
use async_trait::async_trait;

pub use yahoo::YahooChartSource;

/// Trait that every quote provider implements
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Provider ID (e.g., "yahoo")
    fn id(&self) -> &'static str;

    /// Most recent closing price for `ticker` within the lookback `range`
    async fn fetch_latest_close(&self, ticker: &str, range: &str) -> Result<f64>;
}

/// Reject prices that cannot be a real index level.
///
/// Non-finite and negative values are provider failures; zero is accepted.
pub fn check_price(ticker: &str, price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(AppError::provider(ticker, format!("non-finite price {}", price)));
    }
    if price < 0.0 {
        return Err(AppError::provider(ticker, format!("negative price {}", price)));
    }
    Ok(price)
}

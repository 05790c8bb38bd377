//! Yahoo Finance chart adapter
//!
//! Uses the public `/v8/finance/chart/{ticker}` endpoint and reads the last
//! non-null close of the requested range.

mod models;

use crate::config::ProviderConfig;
use crate::error::{AppError, Result};
use crate::providers::QuoteSource;
use async_trait::async_trait;
use models::ChartResponse;
use reqwest::Client;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance quote source
pub struct YahooChartSource {
    client: Client,
    base_url: String,
    interval: String,
}

impl YahooChartSource {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interval: config.interval.clone(),
        })
    }

    fn chart_url(&self, ticker: &str, range: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url,
            urlencoding::encode(ticker),
            urlencoding::encode(range),
            urlencoding::encode(&self.interval),
        )
    }
}

#[async_trait]
impl QuoteSource for YahooChartSource {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_latest_close(&self, ticker: &str, range: &str) -> Result<f64> {
        let url = self.chart_url(ticker, range);
        tracing::debug!("Fetching {} from {}", ticker, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<ChartResponse>(&body);

        if !status.is_success() {
            // Yahoo still sends a chart.error body on 4xx; prefer its description
            let detail = parsed
                .ok()
                .and_then(|r| r.chart.error)
                .and_then(|e| e.description.or(e.code))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(AppError::provider(ticker, detail));
        }

        let parsed = parsed
            .map_err(|e| AppError::provider(ticker, format!("malformed response: {}", e)))?;

        latest_close(ticker, parsed)
    }
}

/// Pull the most recent close out of a chart response
fn latest_close(ticker: &str, response: ChartResponse) -> Result<f64> {
    if let Some(error) = response.chart.error {
        let detail = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown provider error".to_string());
        return Err(AppError::provider(ticker, detail));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::provider(ticker, "empty response"))?;

    let last_close = result
        .indicators
        .as_ref()
        .and_then(|indicators| indicators.quote.first())
        .and_then(|quote| quote.close.iter().rev().find_map(|close| *close));

    last_close
        .or_else(|| result.meta.as_ref().and_then(|meta| meta.regularMarketPrice))
        .ok_or_else(|| AppError::provider(ticker, "no closing price in response"))
}

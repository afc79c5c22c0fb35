//! Market price client for the ticker REST API.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::MarketDataSource;

const DEFAULT_BASE_URL: &str = "https://blockchain.info";

/// Market price client
pub struct TickerClient {
    /// Service base URL
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

/// One currency entry in the ticker response
#[derive(Debug, Deserialize)]
struct TickerQuote {
    last: Decimal,
}

impl TickerClient {
    /// Create a client against the public service
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build ticker HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Build the ticker URL
    fn ticker_url(&self) -> String {
        format!("{}/ticker", self.base_url)
    }
}

#[async_trait]
impl MarketDataSource for TickerClient {
    fn name(&self) -> &str {
        "ticker"
    }

    async fn fetch_price(&self) -> Result<Decimal> {
        let url = self.ticker_url();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach market-data source")?;

        if !response.status().is_success() {
            anyhow::bail!("Market-data source returned status {}", response.status());
        }

        let quotes: HashMap<String, TickerQuote> = response
            .json()
            .await
            .context("Failed to parse ticker response")?;

        quotes
            .get("USD")
            .map(|q| q.last)
            .ok_or_else(|| anyhow::anyhow!("Ticker response is missing the USD quote"))
    }
}

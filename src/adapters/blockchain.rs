//! Ledger history client for a blockchain.info-compatible REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::RawTransaction;

use super::LedgerSource;

const DEFAULT_BASE_URL: &str = "https://blockchain.info";

/// Ledger history client
pub struct BlockchainClient {
    /// Service base URL
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Address history envelope from the `rawaddr` endpoint
#[derive(Debug, Deserialize)]
struct AddressHistory {
    #[serde(default)]
    txs: Vec<RawTransaction>,
}

impl BlockchainClient {
    /// Create a client against the public service
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build ledger HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Build the history URL for an address
    fn history_url(&self, address: &str) -> String {
        format!("{}/rawaddr/{}", self.base_url, address)
    }
}

#[async_trait]
impl LedgerSource for BlockchainClient {
    fn name(&self) -> &str {
        "blockchain"
    }

    async fn fetch_transactions(&self, address: &str) -> Result<Vec<RawTransaction>> {
        let url = self.history_url(address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach ledger source")?;

        // The provider reports an unknown address as 404. That is the
        // no-history outcome, not a transport failure.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            anyhow::bail!("Ledger source returned status {}", response.status());
        }

        let history: AddressHistory = response
            .json()
            .await
            .context("Failed to parse ledger response")?;

        Ok(history.txs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_url() {
        let client =
            BlockchainClient::with_base_url("https://ledger.test", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.history_url("1A2b3C"),
            "https://ledger.test/rawaddr/1A2b3C"
        );
    }

    #[test]
    fn test_history_envelope_parsing() {
        let json = r#"{"txs": [{"hash": "aa", "time": 1700000000, "inputs": [], "out": []}]}"#;
        let history: AddressHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.txs.len(), 1);
        assert_eq!(history.txs[0].hash, "aa");
    }
}

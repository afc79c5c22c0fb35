//! Adapter interfaces for the external services the pipeline consumes.
//!
//! Adapters provide a unified interface for the ledger history source,
//! the market-data source, and the outbound mail service.

pub mod blockchain;
pub mod sendgrid;
pub mod ticker;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::RawTransaction;

// Re-export the production clients
pub use blockchain::BlockchainClient;
pub use sendgrid::SendGridClient;
pub use ticker::TickerClient;

/// Source of transaction history for an address
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch the full transaction history for `address`.
    ///
    /// An empty history is a valid outcome, not an error; transport
    /// failures are errors.
    async fn fetch_transactions(&self, address: &str) -> Result<Vec<RawTransaction>>;
}

/// Source of the current asset price
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch the current USD price for the asset. Asset-wide, not
    /// address-scoped; the quote is valid only for this instant.
    async fn fetch_price(&self) -> Result<Decimal>;
}

/// Outbound mail submission
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Submit a message, returning the provider status code
    async fn send(&self, message: &OutboundEmail) -> Result<u16>;
}

/// A fully assembled outbound message with one attachment
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: EmailAttachment,
}

/// An attachment in transport-safe encoding
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    /// Base64-encoded file content
    pub content: String,

    /// File name shown to the recipient
    pub file_name: String,

    /// MIME type of the decoded content
    pub mime_type: String,
}

//! ledgerpost - address statement reporting service
//!
//! Takes a ledger address and a recipient email, pulls the address's
//! transaction history and the current market price, derives a
//! per-transaction summary, writes it to a CSV statement, and emails
//! the statement as an attachment.
//!
//! # Architecture
//!
//! The system is a single linear report pipeline:
//! - Validate the request fields
//! - Acquire history and price from the external sources
//! - Summarize the raw records (pure transformation)
//! - Generate the statement artifact
//! - Dispatch it by mail (failures absorbed, never fatal)
//!
//! # Modules
//!
//! - `adapters`: External service clients (ledger, market data, mail)
//! - `core`: Pipeline logic (Orchestrator, ReportWriter, Dispatcher)
//! - `domain`: Data structures (requests, transactions, summary rows)
//! - `http`: Web transport (submission form and report endpoint)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP server
//! ledgerpost serve
//!
//! # Generate and mail one report from the terminal
//! ledgerpost send 1A2b3C user@example.com
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;

// Re-export main types at crate root for convenience
pub use crate::core::{
    DeliveryOutcome, Orchestrator, PipelineError, PipelineSettings, ReportArtifact, ReportOutcome,
};
pub use crate::domain::{summarize, RawTransaction, ReportRequest, RequestPayload, SummaryRow};

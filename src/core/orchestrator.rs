//! Report pipeline orchestrator.
//!
//! Sequences Validate → Acquire → Summarize → Generate → Dispatch and owns
//! the success/failure contract returned to the transport layer.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, instrument, warn};

use crate::adapters::{LedgerSource, Mailer, MarketDataSource};
use crate::domain::{summarize, ReportRequest, RequestPayload};

use super::dispatch::{DeliveryOutcome, Dispatcher};
use super::error::PipelineError;
use super::report::{ReportArtifact, ReportWriter};
use super::retry::RetryPolicy;

/// Settings for one orchestrator instance
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Directory the artifacts are written into
    pub reports_dir: PathBuf,

    /// Fixed sender identity for outbound mail
    pub sender: String,

    /// Remove the artifact after the provider accepts the message
    pub remove_after_dispatch: bool,

    /// Retry policy for external calls
    pub retry: RetryPolicy,
}

/// Terminal result of a successful pipeline run
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// The generated artifact
    pub artifact: ReportArtifact,

    /// What happened to the mail submission
    pub delivery: DeliveryOutcome,
}

/// Main report pipeline orchestrator
pub struct Orchestrator {
    ledger: Arc<dyn LedgerSource>,
    market: Arc<dyn MarketDataSource>,
    dispatcher: Dispatcher,
    writer: ReportWriter,
    retry: RetryPolicy,
    remove_after_dispatch: bool,

    /// Per-address locks. Concurrent requests for one address serialize,
    /// so the deterministic artifact name cannot be raced; distinct
    /// addresses proceed in parallel.
    address_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Orchestrator {
    /// Create an orchestrator over the given external services
    pub fn new(
        ledger: Arc<dyn LedgerSource>,
        market: Arc<dyn MarketDataSource>,
        mailer: Arc<dyn Mailer>,
        settings: PipelineSettings,
    ) -> Self {
        let dispatcher = Dispatcher::new(mailer, settings.retry.clone(), settings.sender);

        Self {
            ledger,
            market,
            dispatcher,
            writer: ReportWriter::new(settings.reports_dir),
            retry: settings.retry,
            remove_after_dispatch: settings.remove_after_dispatch,
            address_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Run the full pipeline for one request
    #[instrument(skip_all)]
    pub async fn run(&self, payload: &RequestPayload) -> Result<ReportOutcome, PipelineError> {
        // Validate before any external call.
        let request = ReportRequest::from_payload(payload)?;
        info!(address = %request.address, "Report request accepted");

        let guard = self.lock_address(&request.address);
        let _held = guard.lock().await;

        // Acquire: transactions first, then the price quote. Neither result
        // is cached across requests.
        let transactions = self
            .retry
            .run("transaction history", || {
                self.ledger.fetch_transactions(&request.address)
            })
            .await
            .map_err(PipelineError::Acquisition)?;

        if transactions.is_empty() {
            warn!(address = %request.address, "No transaction history");
            return Err(PipelineError::NotFound(request.address));
        }

        let price = self
            .retry
            .run("price quote", || self.market.fetch_price())
            .await
            .map_err(PipelineError::Acquisition)?;

        let rows = summarize(&transactions, &request.address, price);
        let artifact = self.writer.generate(&rows, &request.address)?;

        // Dispatch failures are absorbed: the report was generated either way.
        let delivery = self.dispatcher.dispatch(&artifact, &request.email).await;

        if self.remove_after_dispatch && delivery.email_sent {
            if let Err(e) = std::fs::remove_file(&artifact.path) {
                warn!(
                    file = %artifact.path.display(),
                    error = %e,
                    "Failed to remove dispatched report"
                );
            }
        }

        Ok(ReportOutcome { artifact, delivery })
    }

    fn lock_address(&self, address: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .address_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(address.to_string()).or_default().clone()
    }
}

//! Pipeline error taxonomy.

use thiserror::Error;

use crate::domain::ValidationError;

/// Errors that abort the report pipeline.
///
/// Delivery failures are deliberately absent: they are absorbed into the
/// [`DeliveryOutcome`](super::DeliveryOutcome) so a generated report is
/// never reported to the caller as a failed request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required request fields missing or empty
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The address has no retrievable ledger history
    #[error("no transaction history for address '{0}'")]
    NotFound(String),

    /// An external data source was unreachable or errored
    #[error("data acquisition failed: {0}")]
    Acquisition(#[source] anyhow::Error),

    /// The report artifact could not be built
    #[error("report serialization failed: {0}")]
    Serialization(#[source] anyhow::Error),
}

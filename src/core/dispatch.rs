//! Delivery dispatch for generated reports.
//!
//! Dispatch never fails the request: every error on the way to the mail
//! service (file read, encoding, provider rejection) is absorbed into the
//! returned [`DeliveryOutcome`] and logged.

use std::sync::Arc;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::{error, info};

use crate::adapters::{EmailAttachment, Mailer, OutboundEmail};

use super::report::ReportArtifact;
use super::retry::RetryPolicy;

/// MIME type of the generated spreadsheet
const REPORT_MIME_TYPE: &str = "text/csv";

/// Fixed subject and body for every report message
const REPORT_SUBJECT: &str = "Your address statement report";
const REPORT_BODY: &str = "Please find your address statement report attached.";

/// Outcome of a dispatch attempt
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    /// Whether the provider accepted the message
    pub email_sent: bool,

    /// Provider status code on acceptance
    pub provider_status: Option<u16>,

    /// Failure detail when the message was not accepted
    pub error: Option<String>,
}

impl DeliveryOutcome {
    fn sent(status: u16) -> Self {
        Self {
            email_sent: true,
            provider_status: Some(status),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            email_sent: false,
            provider_status: None,
            error: Some(error),
        }
    }
}

/// Packages artifacts as mail attachments and submits them
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    retry: RetryPolicy,
    sender: String,
}

impl Dispatcher {
    /// Create a dispatcher sending from the fixed `sender` identity
    pub fn new(mailer: Arc<dyn Mailer>, retry: RetryPolicy, sender: String) -> Self {
        Self {
            mailer,
            retry,
            sender,
        }
    }

    /// Submit `artifact` to `recipient`, absorbing all failures
    pub async fn dispatch(&self, artifact: &ReportArtifact, recipient: &str) -> DeliveryOutcome {
        match self.try_dispatch(artifact, recipient).await {
            Ok(status) => {
                info!(
                    mailer = self.mailer.name(),
                    recipient, status, "Report dispatched"
                );
                DeliveryOutcome::sent(status)
            }
            Err(e) => {
                error!(
                    mailer = self.mailer.name(),
                    recipient,
                    error = %e,
                    "Report dispatch failed"
                );
                DeliveryOutcome::failed(e.to_string())
            }
        }
    }

    async fn try_dispatch(&self, artifact: &ReportArtifact, recipient: &str) -> anyhow::Result<u16> {
        let bytes = tokio::fs::read(&artifact.path)
            .await
            .with_context(|| format!("Failed to read report file {}", artifact.path.display()))?;

        let message = OutboundEmail {
            from: self.sender.clone(),
            to: recipient.to_string(),
            subject: REPORT_SUBJECT.to_string(),
            html_body: REPORT_BODY.to_string(),
            attachment: EmailAttachment {
                content: STANDARD.encode(bytes),
                file_name: artifact.file_name.clone(),
                mime_type: REPORT_MIME_TYPE.to_string(),
            },
        };

        self.retry
            .run("mail dispatch", || self.mailer.send(&message))
            .await
    }
}

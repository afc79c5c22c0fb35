//! SendGrid v3 mail client.
//!
//! Submits an HTML message with a single base64-encoded attachment through
//! the `mail/send` endpoint. The API key comes from the environment at
//! startup and is held only here.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{Mailer, OutboundEmail};

const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

/// SendGrid API client
pub struct SendGridClient {
    /// API key (bearer credential)
    api_key: String,
    /// Service base URL
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl SendGridClient {
    /// Create a client against the public service
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build mail HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.into(),
            client,
        })
    }

    /// Build the send URL
    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.base_url)
    }
}

#[async_trait]
impl Mailer for SendGridClient {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn send(&self, message: &OutboundEmail) -> Result<u16> {
        let url = self.send_url();

        let body = serde_json::json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": message.from },
            "subject": message.subject,
            "content": [{ "type": "text/html", "value": message.html_body }],
            "attachments": [{
                "content": message.attachment.content,
                "filename": message.attachment.file_name,
                "type": message.attachment.mime_type,
                "disposition": "attachment",
            }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach mail service")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Mail service rejected the message with status {}: {}",
                status,
                detail.trim()
            );
        }

        Ok(status.as_u16())
    }
}

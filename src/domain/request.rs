//! Report requests and input validation.
//!
//! Validation checks presence only: address format correctness is left to
//! the ledger source's failure path.

use serde::Deserialize;
use thiserror::Error;

/// Raw form payload as submitted to the endpoint or the CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestPayload {
    pub address: Option<String>,
    pub email: Option<String>,
}

/// A validated report request, alive for one pipeline invocation
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Ledger account identifier supplied by the requester
    pub address: String,

    /// Recipient of the generated report
    pub email: String,
}

/// Validation failures for incoming requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("address is required")]
    MissingAddress,

    #[error("email is required")]
    MissingEmail,
}

impl ReportRequest {
    /// Validate a raw payload into a request
    pub fn from_payload(payload: &RequestPayload) -> Result<Self, ValidationError> {
        let address = required(payload.address.as_deref()).ok_or(ValidationError::MissingAddress)?;
        let email = required(payload.email.as_deref()).ok_or(ValidationError::MissingEmail)?;

        Ok(Self {
            address: address.to_string(),
            email: email.to_string(),
        })
    }
}

fn required(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(address: Option<&str>, email: Option<&str>) -> RequestPayload {
        RequestPayload {
            address: address.map(String::from),
            email: email.map(String::from),
        }
    }

    #[test]
    fn test_valid_payload() {
        let request =
            ReportRequest::from_payload(&payload(Some("1A2b3C"), Some("user@example.com")))
                .unwrap();

        assert_eq!(request.address, "1A2b3C");
        assert_eq!(request.email, "user@example.com");
    }

    #[test]
    fn test_missing_address() {
        let result = ReportRequest::from_payload(&payload(None, Some("user@example.com")));
        assert_eq!(result.unwrap_err(), ValidationError::MissingAddress);
    }

    #[test]
    fn test_missing_email() {
        let result = ReportRequest::from_payload(&payload(Some("1A2b3C"), None));
        assert_eq!(result.unwrap_err(), ValidationError::MissingEmail);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let result = ReportRequest::from_payload(&payload(Some("   "), Some("user@example.com")));
        assert_eq!(result.unwrap_err(), ValidationError::MissingAddress);

        let result = ReportRequest::from_payload(&payload(Some("1A2b3C"), Some("")));
        assert_eq!(result.unwrap_err(), ValidationError::MissingEmail);
    }

    #[test]
    fn test_fields_trimmed() {
        let request =
            ReportRequest::from_payload(&payload(Some("  1A2b3C "), Some(" user@example.com ")))
                .unwrap();

        assert_eq!(request.address, "1A2b3C");
        assert_eq!(request.email, "user@example.com");
    }
}

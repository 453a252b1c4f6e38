//! The uniform response wrapper returned by every MyBank endpoint.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Envelope whose payload is left undecoded. Used for error bodies.
pub type ErrorEnvelope = Envelope<serde_json::Value>;

/// `ApiResponse<T>` as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// The `error` member of an envelope.
///
/// Gateways send a bare string; the services send a structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Structured {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        detail: Option<String>,
    },
}

impl ErrorDetail {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Message(_) => None,
            Self::Structured { code, .. } => code.as_deref(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(m) => Some(m.as_str()),
            Self::Structured { message, .. } => message.as_deref(),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Message(_) => None,
            Self::Structured { detail, .. } => detail.as_deref(),
        }
    }
}

impl<T> Envelope<T> {
    /// Envelope message, or an empty string when the server sent none.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Best human-readable description of a failure: message, then error text.
    pub fn failure_message(&self) -> String {
        if let Some(m) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return m.to_string();
        }
        self.error
            .as_ref()
            .and_then(ErrorDetail::message)
            .filter(|m| !m.is_empty())
            .unwrap_or("Request failed")
            .to_string()
    }

    /// Server timestamp as UTC.
    ///
    /// Accepts RFC 3339 and zone-less local date-times (read as UTC).
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Convert `success: false` into [`Error::Business`].
    pub fn ensure_success(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let message = self.failure_message();
        let (code, detail) = match &self.error {
            Some(err) => (
                err.code().map(String::from),
                err.detail().map(String::from),
            ),
            None => (None, None),
        };
        Err(Error::Business {
            message,
            code,
            detail,
            correlation_id: self.correlation_id,
        })
    }

    /// Unwrap the payload of a successful envelope.
    pub fn into_data(self) -> Result<T> {
        self.ensure_success()?.data.ok_or(Error::MissingData)
    }

    /// Check success for endpoints without a payload.
    pub fn into_unit(self) -> Result<()> {
        self.ensure_success().map(|_| ())
    }
}

/// Parse a server timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success_envelope() {
        let body = json!({
            "success": true,
            "data": {"value": 7},
            "message": "Login successful",
            "error": null,
            "timestamp": "2025-03-01T09:30:00",
            "correlationId": "c-1"
        });
        let env: Envelope<serde_json::Value> = serde_json::from_value(body).unwrap();
        assert!(env.success);
        assert_eq!(env.message(), "Login successful");
        assert_eq!(env.correlation_id.as_deref(), Some("c-1"));
        assert_eq!(env.into_data().unwrap()["value"], 7);
    }

    #[test]
    fn test_string_and_structured_error() {
        let plain: ErrorEnvelope = serde_json::from_value(json!({
            "success": false,
            "message": "",
            "error": "Invalid credentials"
        }))
        .unwrap();
        assert_eq!(plain.failure_message(), "Invalid credentials");
        assert_eq!(plain.error.as_ref().and_then(ErrorDetail::code), None);

        let structured: ErrorEnvelope = serde_json::from_value(json!({
            "success": false,
            "message": "Validation failed",
            "data": {"email": "must be a well-formed email address"},
            "error": {"code": "VALIDATION_ERROR", "message": "Validation failed"}
        }))
        .unwrap();
        assert_eq!(
            structured.error.as_ref().and_then(ErrorDetail::code),
            Some("VALIDATION_ERROR")
        );
        assert!(structured.data.is_some());
    }

    #[test]
    fn test_business_error_from_failed_envelope() {
        let env: Envelope<()> = serde_json::from_value(json!({
            "success": false,
            "message": "Insufficient balance",
            "error": {"code": "INSUFFICIENT_BALANCE", "detail": "available 10.00"},
            "correlationId": "abc"
        }))
        .unwrap();
        match env.into_unit() {
            Err(Error::Business {
                message,
                code,
                detail,
                correlation_id,
            }) => {
                assert_eq!(message, "Insufficient balance");
                assert_eq!(code.as_deref(), Some("INSUFFICIENT_BALANCE"));
                assert_eq!(detail.as_deref(), Some("available 10.00"));
                assert_eq!(correlation_id.as_deref(), Some("abc"));
            }
            other => panic!("expected business error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data() {
        let env: Envelope<String> =
            serde_json::from_value(json!({"success": true, "data": null})).unwrap();
        assert!(matches!(env.into_data(), Err(Error::MissingData)));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-03-01T09:30:00Z").is_some());
        assert!(parse_timestamp("2025-03-01T09:30:00.123456").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}

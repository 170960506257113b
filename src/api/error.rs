//! API error taxonomy
//!
//! Domain clients never interpret failures; everything a call can produce is
//! classified here once and surfaced upward unchanged. Validation failures
//! keep the backend's structured field/message/kind triples so forms can
//! render them inline next to the offending field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the HTTP gateway and domain API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Authorization failure. Handled globally by the gateway (token
    /// cleared, login navigation signalled); callers see it only so they
    /// can stop what they were doing.
    #[error("authorization failed")]
    Unauthorized,

    /// The requested entity does not exist.
    #[error("not found")]
    NotFound,

    /// Backend-supplied field validation errors.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Any other non-2xx response.
    #[error("request failed with status {status}: {detail}")]
    Api { status: u16, detail: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Validation errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// One-line message for notification display.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Validation(errors) => errors
                .iter()
                .map(FieldError::display_message)
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

/// One segment of a validation error location path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocPart {
    Key(String),
    Index(u64),
}

/// A single backend validation error: where, what, and what kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<LocPart>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Build a client-side validation error for a named field.
    pub fn for_field(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec![
                LocPart::Key("body".to_string()),
                LocPart::Key(field.to_string()),
            ],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    /// The offending field name: the last named segment of the location
    /// path, skipping the leading request-section marker.
    pub fn field(&self) -> Option<&str> {
        self.loc.iter().rev().find_map(|part| match part {
            LocPart::Key(key) if key != "body" && key != "query" && key != "path" => {
                Some(key.as_str())
            }
            _ => None,
        })
    }

    pub fn display_message(&self) -> String {
        match self.field() {
            Some(field) => format!("{field}: {}", self.msg),
            None => self.msg.clone(),
        }
    }
}

/// Error body shape used by the backend: `detail` is either a plain string
/// or a list of validation errors.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

/// Classify a non-2xx, non-401, non-404 response body.
pub fn classify(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: ErrorDetail::Fields(errors),
        }) => ApiError::Validation(errors),
        Ok(ErrorBody {
            detail: ErrorDetail::Message(detail),
        }) => ApiError::Api { status, detail },
        Err(_) => ApiError::Api {
            status,
            detail: if body.is_empty() {
                "no error detail".to_string()
            } else {
                body.to_string()
            },
        },
    }
}

//! Client error taxonomy.
//!
//! Every fallible operation in the client returns [`ClientError`]. The
//! variants follow how the dashboard reacts to a failure:
//!
//! - [`ClientError::Network`]: no response at all (connection refused, timeout)
//! - [`ClientError::Http`]: the backend answered with a 4xx/5xx status
//! - [`ClientError::Domain`]: the backend rejected a business rule
//!   (a used QR code, an out-of-range location, a duplicate code)
//! - [`ClientError::AuthExpired`]: a 401 that could not be recovered by a refresh
//! - [`ClientError::Validation`]: client-side form constraints, reported per field
//! - [`ClientError::Cancelled`]: the cached query was cleared while in flight

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

/// Message shown when the backend does not provide one.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Statuses whose `message` body is treated as a business-rule violation.
const DOMAIN_STATUSES: [u16; 3] = [400, 409, 422];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("{message}")]
    Domain {
        status: u16,
        message: String,
        field: Option<String>,
    },

    #[error("Your session has expired. Please sign in again.")]
    AuthExpired,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Location(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Classifies an error response from the backend.
    ///
    /// A 400/409/422 whose JSON body carries a message is a domain error;
    /// everything else is a plain HTTP error. The message comes from
    /// `message`, or from the first entry of an `errors: [{path, msg}]` list.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let first_detail = body
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first());

        let server_message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| first_detail.and_then(|d| d.get("msg")).and_then(Value::as_str))
            .filter(|m| !m.trim().is_empty());

        match server_message {
            Some(message) if DOMAIN_STATUSES.contains(&status) => Self::Domain {
                status,
                message: message.to_string(),
                field: body
                    .get("field")
                    .or_else(|| first_detail.and_then(|d| d.get("path")))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            Some(message) => Self::Http {
                status,
                message: message.to_string(),
            },
            None => Self::Http {
                status,
                message: FALLBACK_MESSAGE.to_string(),
            },
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Domain { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }

    /// Whether a query may silently retry after this error.
    ///
    /// Only transport failures and server-side faults are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(FieldErrors::from_validation(&errors))
    }
}

/// Per-field form errors, keyed by snake_case field name.
///
/// Only the first message for each field is kept, which is what a form
/// renders under the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field unless one is already present.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flattens `validator` output into field messages.
    ///
    /// Struct-level (`schema`) errors are reported under their error code,
    /// which the models use to name the offending field.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let key = if &*field == "__all__" {
                    error.code.to_string()
                } else {
                    field.to_string()
                };
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", key));
                out.insert(key, message);
            }
        }

        out
    }

    /// Maps a backend or validation error onto a form with the given fields.
    ///
    /// Returns `None` when the error has no field-level meaning for this
    /// form, in which case the caller shows it as a section-level message.
    pub fn from_client_error(error: &ClientError, known_fields: &[&str]) -> Option<Self> {
        match error {
            ClientError::Validation(fields) => Some(fields.clone()),
            ClientError::Domain {
                message,
                field: Some(field),
                ..
            } => {
                let field = to_snake_case(field);
                if known_fields.contains(&field.as_str()) {
                    let mut out = Self::new();
                    out.insert(field, message.clone());
                    Some(out)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

/// Converts a camelCase wire field name into the snake_case form field name.
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

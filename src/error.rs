use crate::transport::TransportError;
use crate::wire::xml::XmlError;
use crate::wire::WireNode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or option that caused the error (e.g., "tracking.kind", "request.method")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., accepted values, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "client_builder", "endpoint")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One description/code pair reported by the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierMessage {
    pub code: String,
    pub description: String,
}

/// An error the carrier reported inside a response body.
///
/// `message` and `code` are the combined forms; `messages` keeps every original entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct DomainError {
    pub message: String,
    pub code: String,
    pub messages: Vec<CarrierMessage>,
}

impl DomainError {
    /// Build the combined error from however many messages the carrier sent.
    ///
    /// A single message is used as is. Several messages are joined: descriptions as
    /// `"{description} - (code {code})"` lines, codes comma-separated.
    pub fn from_messages(messages: Vec<CarrierMessage>) -> Self {
        let (message, code) = match messages.as_slice() {
            [] => ("Unknown carrier error".to_string(), String::new()),
            [single] => (single.description.clone(), single.code.clone()),
            many => (
                many.iter()
                    .map(|m| format!("{} - (code {})", m.description, m.code))
                    .collect::<Vec<_>>()
                    .join("\n"),
                many.iter()
                    .map(|m| m.code.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        };
        Self {
            message,
            code,
            messages,
        }
    }
}

impl From<CarrierMessage> for DomainError {
    fn from(message: CarrierMessage) -> Self {
        DomainError::from_messages(vec![message])
    }
}

/// Unified error type for the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Carrier error: {0}")]
    Carrier(#[from] DomainError),

    #[error("Unexpected response format: missing `{expected_path}` in {actual}")]
    Shape {
        expected_path: String,
        actual: String,
    },

    #[error("Usage error: {message}{}", format_context(.context))]
    Usage {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::usage_with_context(msg, ErrorContext::new())
    }

    /// Create a new usage error with structured context
    pub fn usage_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Usage {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// A success response lacked `expected_path`; `actual` is snapshotted as JSON.
    pub fn shape(expected_path: impl Into<String>, actual: &WireNode) -> Self {
        Error::Shape {
            expected_path: expected_path.into(),
            actual: actual.to_value().to_string(),
        }
    }

    /// The carrier-reported error, if this is one.
    pub fn carrier(&self) -> Option<&DomainError> {
        match self {
            Error::Carrier(err) => Some(err),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Usage { context, .. } => Some(context),
            _ => None,
        }
    }
}

//! Request descriptors and the carrier's fixed media types and schema namespaces.

use serde_json::Value;

/// Media types. Each operation family sends the same value as `Accept` and `Content-Type`.
pub mod media_types {
    pub const SHIP_RATE_V3: &str = "application/vnd.cpc.ship.rate-v3+xml";
    pub const NCSHIPMENT_V4: &str = "application/vnd.cpc.ncshipment-v4+xml";
    pub const TRACK: &str = "application/vnd.cpc.track+xml";
}

/// XML namespaces the remote schemas require on request roots.
pub mod namespaces {
    pub const SHIP_RATE_V3: &str = "http://www.canadapost.ca/ws/ship/rate-v3";
    pub const NCSHIPMENT_V4: &str = "http://www.canadapost.ca/ws/ncshipment-v4";
}

/// Everything the pipeline needs for one call.
///
/// `params` become query parameters for GET and an XML body otherwise. When `namespace`
/// is set, the body's top-level element carries it as `xmlns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub call: String,
    pub params: Option<Value>,
    pub content_type: String,
    pub path_prefix: Option<String>,
    pub method: String,
    pub namespace: Option<String>,
}

impl RequestDescriptor {
    /// A GET request for `call`.
    pub fn new(call: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            params: None,
            content_type: content_type.into(),
            path_prefix: None,
            method: "GET".to_string(),
            namespace: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Set the method by name. Unsupported names are rejected when the request runs.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_namespace(mut self, xmlns: impl Into<String>) -> Self {
        self.namespace = Some(xmlns.into());
        self
    }
}

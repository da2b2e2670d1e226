use crate::client::builder::CanadaPostClientBuilder;
use crate::client::endpoint::{self, compose_url, query_pairs};
use crate::client::request::RequestDescriptor;
use crate::client::translate::{translate, translate_error_response};
use crate::error::DomainError;
use crate::transport::{HttpMethod, HttpRequest, Transport};
use crate::wire::{normalize, set_namespace, xml, KeyStyle, WireNode};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the Canada Post web services.
///
/// Holds static configuration only; every call builds its own request and shares no
/// mutable state with concurrent calls.
pub struct CanadaPostClient {
    pub(crate) base_url: Url,
    pub(crate) auth: String,
    pub(crate) customer: Option<String>,
    pub(crate) language: String,
    pub(crate) transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for CanadaPostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanadaPostClient")
            .field("base_url", &self.base_url.as_str())
            .field("customer", &self.customer)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl CanadaPostClient {
    pub fn builder() -> CanadaPostClientBuilder {
        CanadaPostClientBuilder::new()
    }

    /// Client with default settings for `environment`.
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        customer: Option<String>,
        environment: endpoint::Environment,
    ) -> Result<Self> {
        let mut builder = CanadaPostClientBuilder::new()
            .credentials(user_id, password)
            .environment(environment);
        if let Some(customer) = customer {
            builder = builder.customer(customer);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// URL a descriptor resolves to, without sending anything.
    pub fn compose_url(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        let method: HttpMethod = descriptor.method.parse()?;
        let query = match (&descriptor.params, method) {
            (Some(params), HttpMethod::Get) => Some(query_pairs(params)?),
            _ => None,
        };
        Ok(compose_url(
            &self.base_url,
            &descriptor.call,
            descriptor.path_prefix.as_deref(),
            self.customer.as_deref(),
            query.as_deref(),
        ))
    }

    /// Run one request and return the parsed, not yet normalized, response tree.
    ///
    /// Carrier errors are raised before the tree reaches the caller, whether they arrive
    /// in a success body or in the body of a failed response.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<WireNode> {
        let method: HttpMethod = descriptor.method.parse()?;
        let url = self.compose_url(descriptor)?;
        let body = match &descriptor.params {
            Some(params) if method != HttpMethod::Get => {
                Some(encode_body(params, descriptor.namespace.as_deref())?)
            }
            _ => None,
        };
        self.dispatch(method, url, &descriptor.content_type, body)
            .await
    }

    /// Run a request against an absolute URL, typically a link returned by an earlier call.
    pub async fn execute_raw(
        &self,
        method: &str,
        url: &str,
        content_type: &str,
        body: Option<&Value>,
        namespace: Option<&str>,
    ) -> Result<WireNode> {
        let method: HttpMethod = method.parse()?;
        let url = Url::parse(url).map_err(|e| {
            Error::usage_with_context(
                format!("Invalid request URL {url}: {e}"),
                ErrorContext::new().with_field_path("request.url"),
            )
        })?;
        let body = body.map(|b| encode_body(b, namespace)).transpose()?;
        self.dispatch(method, url, content_type, body).await
    }

    fn headers(&self, content_type: &str) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), content_type.to_string()),
            ("Content-Type".to_string(), content_type.to_string()),
            ("Authorization".to_string(), format!("Basic {}", self.auth)),
            ("Accept-Language".to_string(), self.language.clone()),
        ]
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: Url,
        content_type: &str,
        body: Option<String>,
    ) -> Result<WireNode> {
        debug!(%method, %url, has_body = body.is_some(), "dispatching carrier request");
        let request = HttpRequest {
            method,
            url,
            headers: self.headers(content_type),
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                let error = translate_error_response(error);
                warn!(%method, error = %error, "carrier request failed");
                return Err(error);
            }
        };
        info!(%method, status = response.status, "carrier request completed");

        let tree = xml::parse(&response.body)?;
        if let Some(messages) = translate(&tree) {
            let error = DomainError::from_messages(messages);
            warn!(code = %error.code, "carrier reported an error");
            return Err(Error::Carrier(error));
        }
        Ok(tree)
    }
}

/// Serialize a request payload: namespace on the root, hyphenated keys, attributes kept.
pub(crate) fn encode_body(params: &Value, namespace: Option<&str>) -> Result<String> {
    let mut payload = WireNode::from_value(params);
    if let Some(xmlns) = namespace {
        set_namespace(&mut payload, xmlns);
    }
    let wire = normalize(&payload, KeyStyle::Kebab, false);
    Ok(xml::build(&wire)?)
}

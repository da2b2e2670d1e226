use crate::client::core::CanadaPostClient;
use crate::client::endpoint::{parse_base_url, Environment};
use crate::transport::{HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "en-CA";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for creating clients with custom configuration.
///
/// Nothing is read from the process environment unless [`CanadaPostClientBuilder::from_env`]
/// is called.
pub struct CanadaPostClientBuilder {
    user_id: Option<String>,
    password: Option<String>,
    customer: Option<String>,
    language: Option<String>,
    environment: Environment,
    /// Override the gateway URL (primarily for testing with mock servers)
    base_url: Option<String>,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl CanadaPostClientBuilder {
    pub fn new() -> Self {
        Self {
            user_id: None,
            password: None,
            customer: None,
            language: None,
            environment: Environment::default(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            transport: None,
        }
    }

    /// Seed a builder from `CPC_*` variables:
    /// - `CPC_USERNAME` / `CPC_PASSWORD`
    /// - `CPC_CUSTOMER`
    /// - `CPC_LANG`
    /// - `CPC_ENVIRONMENT` (`production` selects the production gateway)
    /// - `CPC_HTTP_TIMEOUT_SECS` (default 30)
    ///
    /// Setters called afterwards take precedence.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        builder.user_id = std::env::var("CPC_USERNAME").ok();
        builder.password = std::env::var("CPC_PASSWORD").ok();
        builder.customer = std::env::var("CPC_CUSTOMER").ok().filter(|c| !c.is_empty());
        builder.language = std::env::var("CPC_LANG").ok().filter(|l| !l.is_empty());
        builder.environment = match std::env::var("CPC_ENVIRONMENT").ok().as_deref() {
            Some(env) if env.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        };
        if let Some(secs) = std::env::var("CPC_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            builder.timeout = Duration::from_secs(secs.max(1));
        }
        builder
    }

    /// API user id and password, sent as HTTP Basic credentials.
    pub fn credentials(mut self, user_id: impl Into<String>, password: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.password = Some(password.into());
        self
    }

    /// Customer number; calls without an explicit path prefix go under `/rs/{customer}`.
    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// `Accept-Language` tag. Defaults to `en-CA`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the gateway URL from the environment.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Timeout applied by the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Inject a transport. The default is a reqwest-backed [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CanadaPostClient> {
        let (user_id, password) = match (self.user_id, self.password) {
            (Some(user_id), Some(password)) if !user_id.is_empty() => (user_id, password),
            _ => {
                return Err(Error::configuration_with_context(
                    "API user id and password are required",
                    ErrorContext::new()
                        .with_field_path("credentials")
                        .with_details("set them with credentials() or CPC_USERNAME/CPC_PASSWORD")
                        .with_source("client_builder"),
                ))
            }
        };

        let base_url = match self.base_url {
            Some(raw) => parse_base_url(&raw)?,
            None => self.environment.base_url()?,
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.timeout)?),
        };

        Ok(CanadaPostClient {
            base_url,
            auth: STANDARD.encode(format!("{user_id}:{password}")),
            customer: self.customer,
            language: self
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            transport,
        })
    }
}

impl Default for CanadaPostClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Mock HTTP server setup for integration tests

use canadapost_client::CanadaPostClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CUSTOMER: &str = "0001234567";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Create a test client pointed at the mock server
    pub fn create_test_client(&self, customer: Option<&str>) -> canadapost_client::Result<CanadaPostClient> {
        let mut builder = CanadaPostClient::builder()
            .credentials("user", "secret")
            .base_url(&self.base_url);
        if let Some(customer) = customer {
            builder = builder.customer(customer);
        }
        builder.build()
    }

    /// Create a mock answering `method path` with an XML body
    pub async fn mock_xml(
        &self,
        method: &str,
        path: &str,
        query: Matcher,
        status: usize,
        body: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .match_query(query)
            .match_header("authorization", "Basic dXNlcjpzZWNyZXQ=")
            .with_status(status)
            .with_header("content-type", "application/xml")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock that also requires the request body to contain `fragment`
    pub async fn mock_xml_with_body(
        &self,
        method: &str,
        path: &str,
        fragment: &str,
        status: usize,
        body: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .match_body(Matcher::Regex(regex::escape(fragment)))
            .with_status(status)
            .with_header("content-type", "application/xml")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for an error response with a plain body
    pub async fn mock_error_response(&self, path: &str, status: usize, error_body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(error_body)
            .create_async()
            .await
    }
}

/// Carrier message envelope with one message per `(code, description)`
pub fn messages_body(messages: &[(&str, &str)]) -> String {
    let entries: String = messages
        .iter()
        .map(|(code, description)| {
            format!("<message><code>{code}</code><description>{description}</description></message>")
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><messages xmlns=\"http://www.canadapost.ca/ws/messages\">{entries}</messages>"
    )
}

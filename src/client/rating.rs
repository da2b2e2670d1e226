//! Rating: service discovery and price quotes.

use crate::client::core::CanadaPostClient;
use crate::client::request::{media_types, namespaces, RequestDescriptor};
use crate::client::translate::{check_result_format, required_text};
use crate::wire::{as_list, normalize, Element, KeyStyle, WireNode};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

const RATING_PREFIX: &str = "rs/ship";
const CUSTOMER_NUMBER: &str = "customerNumber";

/// A service offered between two points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub service_code: String,
    pub service_name: String,
}

impl CanadaPostClient {
    /// List the services available from `origin_postal_code` to `destination_country`.
    pub async fn discover_services(
        &self,
        origin_postal_code: &str,
        destination_country: &str,
        destination_postal_code: Option<&str>,
    ) -> Result<Vec<ServiceSummary>> {
        let mut params = json!({
            "origpc": origin_postal_code,
            "country": destination_country,
        });
        if let Some(postal_code) = destination_postal_code {
            params["destpc"] = Value::String(postal_code.to_string());
        }

        let descriptor = RequestDescriptor::new("service", media_types::SHIP_RATE_V3)
            .with_path_prefix(RATING_PREFIX)
            .with_params(params);
        let tree = normalize(&self.execute(&descriptor).await?, KeyStyle::Camel, true);

        let services = check_result_format(&tree, "services.service")?;
        as_list(Some(services))
            .into_iter()
            .map(|service| {
                Ok(ServiceSummary {
                    service_code: required_text(service, "services.service", "serviceCode")?,
                    service_name: required_text(service, "services.service", "serviceName")?,
                })
            })
            .collect()
    }

    /// Price a mailing scenario.
    ///
    /// `scenario` holds the fields of `mailing-scenario` in either key style. The configured
    /// customer number is placed first, where the schema expects it. Each returned quote has
    /// its `serviceLink` removed and `priceDetails.adjustments` / `priceDetails.options`
    /// flattened to lists.
    pub async fn get_rates(&self, scenario: Value) -> Result<Vec<Value>> {
        let Value::Object(fields) = scenario else {
            return Err(Error::usage_with_context(
                "mailing scenario must be an object",
                ErrorContext::new().with_field_path("mailingScenario"),
            ));
        };

        let mut ordered = Map::with_capacity(fields.len() + 1);
        if let Some(customer) = self.customer() {
            ordered.insert(CUSTOMER_NUMBER.to_string(), Value::String(customer.to_string()));
        }
        for (key, value) in fields {
            // keys are compared in application casing so `customer-number` is caught too
            if ordered.contains_key(&KeyStyle::Camel.apply(&key)) {
                continue;
            }
            ordered.insert(key, value);
        }

        let descriptor = RequestDescriptor::new("price", media_types::SHIP_RATE_V3)
            .with_method("POST")
            .with_path_prefix(RATING_PREFIX)
            .with_namespace(namespaces::SHIP_RATE_V3)
            .with_params(json!({ "mailingScenario": Value::Object(ordered) }));
        let tree = normalize(&self.execute(&descriptor).await?, KeyStyle::Camel, true);

        let quotes = check_result_format(&tree, "priceQuotes.priceQuote")?;
        let quotes: Vec<Value> = as_list(Some(quotes))
            .into_iter()
            .map(|quote| reshape_quote(quote.clone()).to_value())
            .collect();
        debug!(count = quotes.len(), "price quotes received");
        Ok(quotes)
    }
}

fn reshape_quote(mut quote: WireNode) -> WireNode {
    if let Some(element) = quote.as_element_mut() {
        element.remove("serviceLink");
        if let Some(details) = element.get_mut("priceDetails").and_then(WireNode::as_element_mut) {
            flatten_collection(details, "adjustments", "adjustment");
            flatten_collection(details, "options", "option");
        }
    }
    quote
}

/// Replace `<key><item/>..</key>` with the list of items; absent or empty becomes `[]`.
fn flatten_collection(parent: &mut Element, key: &str, item: &str) {
    let items: Vec<WireNode> = as_list(parent.get(key).and_then(|node| node.get(item)))
        .into_iter()
        .cloned()
        .collect();
    parent.insert(key, WireNode::List(items));
}

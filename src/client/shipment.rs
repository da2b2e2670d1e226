//! Non-contract shipments: creation, lookup, listing and refunds.

use crate::client::core::CanadaPostClient;
use crate::client::links::{extract_links, LinkEntry, Links};
use crate::client::request::{media_types, namespaces, RequestDescriptor};
use crate::client::translate::{check_result_format, required_text};
use crate::utils::date::format_date;
use crate::wire::{as_list, normalize, KeyStyle, WireNode};
use crate::{Error, ErrorContext, Result};
use chrono::{DateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;
use tracing::debug;

const SHIPMENT_INFO: &str = "nonContractShipmentInfo";
const REFUND_INFO: &str = "nonContractShipmentRefundRequestInfo";

const SHIPMENT_ID_PATTERN: &str = r"ncshipment/([0-9]+)";

static SHIPMENT_ID: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(SHIPMENT_ID_PATTERN));

/// A created or fetched shipment with its links by relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentInfo {
    pub shipment_id: String,
    pub tracking_pin: Option<String>,
    pub links: Links,
}

/// One entry of a shipment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLink {
    pub shipment_id: String,
    pub href: String,
    pub media_type: Option<String>,
    pub rel: String,
}

/// Acknowledgement of a refund request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundTicket {
    pub service_ticket_id: String,
    pub service_ticket_date: String,
}

impl CanadaPostClient {
    /// Create a non-contract shipment. `shipment` holds the fields of
    /// `non-contract-shipment` in either key style.
    pub async fn create_non_contract_shipment(&self, shipment: Value) -> Result<ShipmentInfo> {
        let descriptor = RequestDescriptor::new("ncshipment", media_types::NCSHIPMENT_V4)
            .with_method("POST")
            .with_namespace(namespaces::NCSHIPMENT_V4)
            .with_params(json!({ "nonContractShipment": shipment }));
        let tree = normalize(&self.execute(&descriptor).await?, KeyStyle::Camel, false);
        let info = shipment_info(&tree)?;
        debug!(shipment_id = %info.shipment_id, "non-contract shipment created");
        Ok(info)
    }

    pub async fn get_shipment(&self, shipment_id: &str) -> Result<ShipmentInfo> {
        let tree = self.load_shipment(shipment_id).await?;
        shipment_info(&tree)
    }

    /// Full shipment details as an application object.
    pub async fn get_shipment_details(&self, shipment_id: &str) -> Result<Value> {
        let descriptor = RequestDescriptor::new(
            format!("ncshipment/{shipment_id}/details"),
            media_types::NCSHIPMENT_V4,
        );
        let tree = self.execute(&descriptor).await?;
        Ok(normalize(&tree, KeyStyle::Camel, true).to_value())
    }

    /// Shipments created between `from` and `to` (or now).
    ///
    /// Links whose href carries no numeric shipment id are skipped.
    pub async fn get_shipments<Tz>(
        &self,
        from: &DateTime<Tz>,
        to: Option<&DateTime<Tz>>,
    ) -> Result<Vec<ShipmentLink>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut params = json!({ "from": format_date(from) });
        if let Some(to) = to {
            params["to"] = Value::String(format_date(to));
        }
        let descriptor = RequestDescriptor::new("ncshipment", media_types::NCSHIPMENT_V4)
            .with_params(params);
        let tree = self.execute(&descriptor).await?;

        let listing = check_result_format(&tree, "non-contract-shipments")?;
        let pattern = shipment_id_pattern()?;
        Ok(as_list(listing.get("link"))
            .into_iter()
            .filter_map(LinkEntry::from_node)
            .filter_map(|link| {
                let shipment_id = shipment_id_from_href(pattern, &link.href)?;
                Some(ShipmentLink {
                    shipment_id,
                    href: link.href,
                    media_type: link.media_type,
                    rel: link.relation,
                })
            })
            .collect())
    }

    /// Request a refund for a shipment.
    ///
    /// Fetches the shipment first to discover its `refund` link, then posts the request
    /// there. A shipment without that link cannot be refunded and yields a shape error.
    pub async fn refund_non_contract_shipment(
        &self,
        shipment_id: &str,
        email: &str,
    ) -> Result<RefundTicket> {
        let tree = self.load_shipment(shipment_id).await?;
        let info = shipment_info(&tree)?;
        let Some(href) = info.links.get("refund").and_then(|target| target.first()) else {
            let actual = tree.get(SHIPMENT_INFO).unwrap_or(&tree);
            return Err(Error::shape(format!("{SHIPMENT_INFO}.links.refund"), actual));
        };

        let body = json!({ "nonContractShipmentRefundRequest": { "email": email } });
        let response = self
            .execute_raw(
                "POST",
                href,
                media_types::NCSHIPMENT_V4,
                Some(&body),
                Some(namespaces::NCSHIPMENT_V4),
            )
            .await?;

        let tree = normalize(&response, KeyStyle::Camel, true);
        let ticket = check_result_format(&tree, REFUND_INFO)?;
        Ok(RefundTicket {
            service_ticket_id: required_text(ticket, REFUND_INFO, "serviceTicketId")?,
            service_ticket_date: required_text(ticket, REFUND_INFO, "serviceTicketDate")?,
        })
    }

    async fn load_shipment(&self, shipment_id: &str) -> Result<WireNode> {
        let descriptor = RequestDescriptor::new(
            format!("ncshipment/{shipment_id}"),
            media_types::NCSHIPMENT_V4,
        );
        let tree = self.execute(&descriptor).await?;
        Ok(normalize(&tree, KeyStyle::Camel, false))
    }
}

/// Read a shipment from a camel-cased tree that still carries link attributes.
fn shipment_info(tree: &WireNode) -> Result<ShipmentInfo> {
    let info = check_result_format(tree, SHIPMENT_INFO)?;
    Ok(ShipmentInfo {
        shipment_id: required_text(info, SHIPMENT_INFO, "shipmentId")?,
        tracking_pin: info
            .get("trackingPin")
            .and_then(WireNode::as_text)
            .map(str::to_string),
        links: extract_links(info.get("links").and_then(|links| links.get("link"))),
    })
}

fn shipment_id_pattern() -> Result<&'static Regex> {
    SHIPMENT_ID.as_ref().map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid shipment id pattern {SHIPMENT_ID_PATTERN}: {e}"),
            ErrorContext::new().with_source("shipment"),
        )
    })
}

fn shipment_id_from_href(pattern: &Regex, href: &str) -> Option<String> {
    let captures = pattern.captures(href)?;
    Some(captures.get(1)?.as_str().to_string())
}

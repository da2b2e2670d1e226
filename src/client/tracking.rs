//! Tracking by PIN, delivery notice card, or customer reference.

use crate::client::core::CanadaPostClient;
use crate::client::request::{media_types, RequestDescriptor};
use crate::client::translate::check_result_format;
use crate::wire::{as_list, normalize, Element, KeyStyle, WireNode};
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

const TRACKING_PREFIX: &str = "vis/track";

/// How a parcel is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingKind {
    Pin,
    Reference,
    Dnc,
}

impl TrackingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingKind::Pin => "pin",
            TrackingKind::Reference => "ref",
            TrackingKind::Dnc => "dnc",
        }
    }
}

impl fmt::Display for TrackingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pin" => Ok(TrackingKind::Pin),
            "ref" => Ok(TrackingKind::Reference),
            "dnc" => Ok(TrackingKind::Dnc),
            other => Err(Error::usage_with_context(
                "Unknown tracking format. Should be one of pin, ref, dnc",
                ErrorContext::new()
                    .with_field_path("tracking.kind")
                    .with_details(format!("got {other:?}")),
            )),
        }
    }
}

/// A tracking lookup key.
///
/// Reference lookups carry query parameters such as `customerRef`, `mailingDateFrom` and
/// `mailingDateTo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingId {
    Pin(String),
    Dnc(String),
    Reference(Vec<(String, String)>),
}

impl TrackingId {
    pub fn kind(&self) -> TrackingKind {
        match self {
            TrackingId::Pin(_) => TrackingKind::Pin,
            TrackingId::Dnc(_) => TrackingKind::Dnc,
            TrackingId::Reference(_) => TrackingKind::Reference,
        }
    }

    /// Build an identifier from a kind name and a value. `ref` is not accepted here since
    /// reference lookups need parameters rather than a single value.
    pub fn parse(kind: &str, value: impl Into<String>) -> Result<Self> {
        match kind.parse::<TrackingKind>()? {
            TrackingKind::Pin => Ok(TrackingId::Pin(value.into())),
            TrackingKind::Dnc => Ok(TrackingId::Dnc(value.into())),
            TrackingKind::Reference => Err(Error::usage_with_context(
                "Reference tracking takes query parameters, not a single value",
                ErrorContext::new().with_field_path("tracking.kind"),
            )),
        }
    }
}

impl CanadaPostClient {
    /// Summary records for an identifier. Reference lookups may match several parcels.
    pub async fn get_tracking_summary(&self, id: &TrackingId) -> Result<Vec<Value>> {
        let descriptor = match id {
            TrackingId::Pin(pin) => {
                RequestDescriptor::new(format!("pin/{pin}/summary"), media_types::TRACK)
            }
            TrackingId::Dnc(dnc) => {
                RequestDescriptor::new(format!("dnc/{dnc}/summary"), media_types::TRACK)
            }
            TrackingId::Reference(params) => {
                let params: Map<String, Value> = params
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect();
                RequestDescriptor::new("ref/summary", media_types::TRACK)
                    .with_params(Value::Object(params))
            }
        }
        .with_path_prefix(TRACKING_PREFIX);

        let tree = normalize(&self.execute(&descriptor).await?, KeyStyle::Camel, true);
        let summaries = check_result_format(&tree, "trackingSummary.pinSummary")?;
        Ok(as_list(Some(summaries))
            .into_iter()
            .map(WireNode::to_value)
            .collect())
    }

    /// Detailed history for a PIN or delivery notice card.
    ///
    /// `deliveryOptions` is reshaped to `[{option, description}]` and `significantEvents`
    /// to the list of its occurrences.
    pub async fn get_tracking_detail(&self, id: &TrackingId) -> Result<Value> {
        let value = match id {
            TrackingId::Pin(value) | TrackingId::Dnc(value) => value,
            TrackingId::Reference(_) => {
                return Err(Error::usage_with_context(
                    "Unknown tracking format. Should be one of pin, dnc",
                    ErrorContext::new()
                        .with_field_path("tracking.kind")
                        .with_details("ref"),
                ))
            }
        };

        let descriptor =
            RequestDescriptor::new(format!("{}/{value}/detail", id.kind()), media_types::TRACK)
                .with_path_prefix(TRACKING_PREFIX);
        let tree = normalize(&self.execute(&descriptor).await?, KeyStyle::Camel, true);
        let mut detail = check_result_format(&tree, "trackingDetail")?.clone();

        if let Some(element) = detail.as_element_mut() {
            reshape_delivery_options(element);
            if element.get("significantEvents").is_some() {
                let events: Vec<WireNode> =
                    as_list(element.get("significantEvents").and_then(|e| e.get("occurrence")))
                        .into_iter()
                        .cloned()
                        .collect();
                element.insert("significantEvents", WireNode::List(events));
            }
        }
        Ok(detail.to_value())
    }
}

fn reshape_delivery_options(detail: &mut Element) {
    let Some(options) = detail.get("deliveryOptions") else {
        return;
    };
    let reshaped: Vec<WireNode> = as_list(options.get("item"))
        .into_iter()
        .filter_map(|item| {
            let option = item.get("deliveryOption")?.as_text()?;
            let description = item.get("deliveryOptionDescription")?.as_text()?;
            Some(WireNode::Element(
                Element::new()
                    .with_child("option", WireNode::text(option))
                    .with_child("description", WireNode::text(description)),
            ))
        })
        .collect();
    detail.insert("deliveryOptions", WireNode::List(reshaped));
}

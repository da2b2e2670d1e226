//! Canada Post client.
//!
//! The request pipeline lives in `core`; each carrier service family adds its operations
//! to [`CanadaPostClient`] from its own submodule.

pub mod builder;
pub mod core;
pub mod endpoint;
pub mod links;
pub mod rating;
pub mod request;
pub mod shipment;
pub mod tracking;
pub mod translate;

pub use builder::CanadaPostClientBuilder;
pub use core::CanadaPostClient;
pub use endpoint::Environment;
pub use links::{extract_links, LinkEntry, LinkTarget, Links};
pub use rating::ServiceSummary;
pub use request::RequestDescriptor;
pub use shipment::{RefundTicket, ShipmentInfo, ShipmentLink};
pub use tracking::{TrackingId, TrackingKind};
pub use translate::{check_result_format, translate, translate_error_response};

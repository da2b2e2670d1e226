//! # canadapost-client
//!
//! Async client for the Canada Post XML web services.
//!
//! ## Overview
//!
//! Calls are described as plain request descriptors, encoded to the carrier's hyphenated
//! XML, dispatched over a pluggable transport, and decoded back into camel-cased
//! application objects. Carrier errors are recognized whether they arrive in a failed
//! response or inside an otherwise successful one.
//!
//! ## Key Features
//!
//! - **Wire Tree**: [`wire::WireNode`] models XML attributes and text as typed fields
//! - **Normalization**: [`wire::normalize`] converts key casing and unwraps text-only elements
//! - **Single list coercion**: [`wire::as_list`] reconciles single-vs-repeated elements
//! - **Typed errors**: carrier, shape, usage, configuration and transport failures stay distinct
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canadapost_client::{CanadaPostClient, Environment};
//!
//! #[tokio::main]
//! async fn main() -> canadapost_client::Result<()> {
//!     let client = CanadaPostClient::builder()
//!         .credentials("api-user", "api-password")
//!         .customer("0001234567")
//!         .environment(Environment::Development)
//!         .build()?;
//!
//!     for service in client.discover_services("K2B8J6", "CA", Some("J0E1X0")).await? {
//!         println!("{} {}", service.service_code, service.service_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`wire`] | Wire Tree, key casing, normalizer and XML codec |
//! | [`client`] | Client, builder, request pipeline and carrier operations |
//! | [`transport`] | HTTP transport trait and the reqwest implementation |
//! | [`utils`] | Path lookup and date formatting helpers |

pub mod client;
pub mod transport;
pub mod utils;
pub mod wire;

// Re-export main types for convenience
pub use client::{
    CanadaPostClient, CanadaPostClientBuilder, Environment, LinkTarget, Links, RefundTicket,
    RequestDescriptor, ServiceSummary, ShipmentInfo, ShipmentLink, TrackingId, TrackingKind,
};
pub use transport::{HttpTransport, Transport, TransportError};
pub use wire::{as_list, normalize, KeyStyle, WireNode};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{CarrierMessage, DomainError, Error, ErrorContext};

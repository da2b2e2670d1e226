//! Integration tests with mock HTTP server

mod error_handling;
mod mock_server;
mod rating;
mod shipment;
mod tracking;

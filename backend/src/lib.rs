//! Freight load-ledger backend.
//!
//! Hexagonal layout: the `domain` module owns entities, services, and ports;
//! `inbound` adapts HTTP requests onto the domain; `outbound` implements the
//! persistence and mileage ports; `server` wires everything together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;

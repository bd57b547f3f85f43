//! MedStore marketplace backend.
//!
//! Hexagonal layout: `domain` holds entities, ports and services; `inbound`
//! adapts HTTP onto the driving ports; `outbound` implements the driven ports
//! for PostgreSQL, memory and Paystack.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seed;
pub mod settings;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

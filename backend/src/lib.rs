//! Bookshelf backend: a book catalogue with reviews and per-book rating
//! aggregates, served over a JSON REST API.
//!
//! Layout follows ports and adapters: [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the driven ports for PostgreSQL, memory and credentials;
//! [`server`] wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! Outbound adapters implementing the domain's driven ports.
//!
//! - `memory`: a mutex-guarded document store for development and tests.
//! - `persistence`: PostgreSQL repositories on Diesel.
//! - `credentials`: signed bearer tokens, Argon2 hashing and secret loading.

pub mod credentials;
pub mod memory;
pub mod persistence;

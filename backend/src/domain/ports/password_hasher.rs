//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        CorruptHash { message: String } => "stored password hash is unreadable: {message}",
    }
}

/// Hashes new passwords and checks candidates against stored hashes.
///
/// Adapters must keep the work off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a new password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hash`] when the hasher fails.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Whether `candidate` matches `stored`.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::CorruptHash`] when `stored` is unreadable.
    async fn verify(&self, candidate: &str, stored: &PasswordHash) -> Result<bool, PasswordHashError>;
}

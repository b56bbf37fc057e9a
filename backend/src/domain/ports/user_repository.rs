//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts.
///
/// Emails are unique; adapters enforce this at the store and report clashes as
/// [`UserRepositoryError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Fetch an account, including its credential, by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch every user in `ids` that exists, in no particular order.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;
}

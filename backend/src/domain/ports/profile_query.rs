//! Driving port for the signed-in user's profile.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Book, Error, ReviewWithBook, User, UserId};

/// A user together with the books they added and the reviews they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The user.
    pub user: User,
    /// Books added by the user, newest first.
    pub books: Vec<Book>,
    /// Reviews written by the user, newest first.
    pub reviews: Vec<ReviewWithBook>,
}

/// Profile read model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Assemble the profile of `user`.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the account does not exist.
    async fn profile(&self, user: &UserId) -> Result<Profile, Error>;
}

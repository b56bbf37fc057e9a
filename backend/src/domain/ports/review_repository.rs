//! Port for review persistence.
//!
//! Adapters must enforce at most one review per `(book, user)` inside
//! [`ReviewRepository::insert`] and report a clash as
//! [`ReviewRepositoryError::Duplicate`], even when the caller already checked.

use async_trait::async_trait;

use crate::domain::{BookId, Rating, Review, ReviewId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The user has already reviewed the book.
        Duplicate { book_id: String, user_id: String } =>
            "user {user_id} already reviewed book {book_id}",
    }
}

/// Storage for reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review, enforcing `(book, user)` uniqueness.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Fetch the review `user` wrote for `book`, if any.
    async fn find_by_book_and_user(
        &self,
        book: &BookId,
        user: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Persist the rating, text and `updated_at` of an existing review.
    ///
    /// Returns `false` when the review no longer exists.
    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError>;

    /// Remove a review. Returns `false` when it did not exist.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError>;

    /// Remove every review of `book`, returning how many were removed.
    async fn delete_by_book(&self, book: &BookId) -> Result<u64, ReviewRepositoryError>;

    /// Reviews of `book`, newest first with ties broken by id ascending.
    async fn list_by_book(&self, book: &BookId) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Reviews written by `user`, newest first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Ratings of every live review of `book`.
    async fn ratings_for_book(&self, book: &BookId) -> Result<Vec<Rating>, ReviewRepositoryError>;

    /// Number of live reviews of `book`.
    async fn count_by_book(&self, book: &BookId) -> Result<u64, ReviewRepositoryError>;
}

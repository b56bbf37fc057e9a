//! Port for book persistence.
//!
//! Besides plain CRUD, the repository exposes the single atomic field update
//! the rating aggregator relies on ([`BookRepository::set_rating`]) and the
//! filtered, paged listing driven by a [`BookListing`].

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Book, BookId, BookListing, RatingSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
    }
}

/// Storage for catalogue entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book.
    async fn insert(&self, book: &Book) -> Result<(), BookRepositoryError>;

    /// Fetch a book by identifier.
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// Fetch every book in `ids` that exists, in no particular order.
    async fn find_many(&self, ids: &[BookId]) -> Result<Vec<Book>, BookRepositoryError>;

    /// Persist the editable fields and `updated_at` of an existing book.
    ///
    /// Aggregate rating fields are left untouched. Returns `false` when the
    /// book no longer exists.
    async fn update_details(&self, book: &Book) -> Result<bool, BookRepositoryError>;

    /// Overwrite `averageRating` and `reviewCount` in one atomic update.
    ///
    /// Returns `false` when the book no longer exists.
    async fn set_rating(
        &self,
        id: &BookId,
        rating: RatingSummary,
    ) -> Result<bool, BookRepositoryError>;

    /// Remove a book. Returns `false` when it did not exist.
    ///
    /// Reviews are not touched; callers cascade explicitly.
    async fn delete(&self, id: &BookId) -> Result<bool, BookRepositoryError>;

    /// One page of books matching `listing`, in its requested order.
    async fn list(&self, listing: &BookListing) -> Result<Page<Book>, BookRepositoryError>;

    /// Every book added by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Book>, BookRepositoryError>;

    /// Identifiers of every stored book.
    async fn list_ids(&self) -> Result<Vec<BookId>, BookRepositoryError>;
}

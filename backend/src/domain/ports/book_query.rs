//! Driving port for catalogue reads.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Book, BookId, BookListing, Error};

/// Catalogue reads consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookQuery: Send + Sync {
    /// One page of books matching `listing`.
    async fn list(&self, listing: BookListing) -> Result<Page<Book>, Error>;

    /// A single book whose `reviewCount` is counted live from the review
    /// store rather than read from the denormalised field.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown identifier.
    async fn get(&self, id: &BookId) -> Result<Book, Error>;
}

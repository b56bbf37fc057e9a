//! Driving port for catalogue mutations.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Book, BookFields, BookId, Error, UserId};

/// Add a book owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookRequest {
    /// Requesting user, recorded as `addedBy`.
    pub owner: UserId,
    /// Raw fields; all are required.
    pub fields: BookFields,
}

/// Edit a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBookRequest {
    /// Book to edit.
    pub book_id: BookId,
    /// Requesting user; must own the book.
    pub requester: UserId,
    /// Raw fields; absent fields keep their value.
    pub fields: BookFields,
}

/// Remove a book and its reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteBookRequest {
    /// Book to remove.
    pub book_id: BookId,
    /// Requesting user; must own the book.
    pub requester: UserId,
}

/// Outcome of a cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBook {
    /// Removed book.
    #[schema(value_type = String, format = Uuid)]
    pub book_id: BookId,
    /// Number of reviews removed with it.
    pub reviews_removed: u64,
}

/// Catalogue mutations consumed by inbound adapters.
///
/// Update and delete check, in order: the book exists (`not_found`), the
/// requester owns it (`forbidden`), then the supplied fields (`invalid_request`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCommand: Send + Sync {
    /// Add a book with zeroed rating aggregates.
    async fn create(&self, request: CreateBookRequest) -> Result<Book, Error>;

    /// Apply a partial edit.
    async fn update(&self, request: UpdateBookRequest) -> Result<Book, Error>;

    /// Delete the book, then its reviews.
    async fn delete(&self, request: DeleteBookRequest) -> Result<DeletedBook, Error>;
}

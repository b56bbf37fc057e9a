//! Driving port for review mutations.
//!
//! Implementations enforce the review invariants in a fixed order so the
//! first violated rule decides the error:
//!
//! - create: book exists, requester is not its owner, requester has not
//!   reviewed it yet, fields are valid;
//! - update: review exists, requester wrote it, supplied fields are valid;
//! - delete: review exists, requester wrote it.
//!
//! Every committed mutation is followed by exactly one rating recompute of the
//! affected book.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BookId, Error, Review, ReviewFields, ReviewId, UserId};

/// Write a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReviewRequest {
    /// Book being reviewed.
    pub book_id: BookId,
    /// Requesting user.
    pub reviewer: UserId,
    /// Raw fields; both are required.
    pub fields: ReviewFields,
}

/// Edit a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReviewRequest {
    /// Review to edit.
    pub review_id: ReviewId,
    /// Requesting user; must be the author.
    pub requester: UserId,
    /// Raw fields; absent fields keep their value.
    pub fields: ReviewFields,
}

/// Remove a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReviewRequest {
    /// Review to remove.
    pub review_id: ReviewId,
    /// Requesting user; must be the author.
    pub requester: UserId,
}

/// Outcome of a review deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedReview {
    /// Removed review.
    #[schema(value_type = String, format = Uuid)]
    pub review_id: ReviewId,
    /// Book whose aggregates were recomputed.
    #[schema(value_type = String, format = Uuid)]
    pub book_id: BookId,
}

/// Review mutations consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Write a review.
    ///
    /// # Errors
    ///
    /// `not_found`, `forbidden` (own book), `conflict` (already reviewed) or
    /// `invalid_request`, in that order of precedence.
    async fn create(&self, request: CreateReviewRequest) -> Result<Review, Error>;

    /// Edit a review.
    ///
    /// # Errors
    ///
    /// `not_found`, `forbidden` (not the author) or `invalid_request`.
    async fn update(&self, request: UpdateReviewRequest) -> Result<Review, Error>;

    /// Remove a review.
    ///
    /// # Errors
    ///
    /// `not_found` or `forbidden` (not the author).
    async fn delete(&self, request: DeleteReviewRequest) -> Result<DeletedReview, Error>;
}

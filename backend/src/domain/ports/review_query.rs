//! Driving port for review reads.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AverageRating, BookId, Error, RatingDistribution, ReviewWithReviewer};

/// The reviews of one book with their live aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookReviews {
    /// Reviews, newest first.
    pub reviews: Vec<ReviewWithReviewer>,
    /// Number of reviews.
    pub total: u64,
    /// Mean rating computed from `reviews`.
    #[schema(value_type = f64, example = 4.5)]
    pub average_rating: AverageRating,
}

/// Review reads consumed by inbound adapters.
///
/// Neither operation fails for an unknown book; both report an empty result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Reviews of `book` with reviewer names.
    async fn list_for_book(&self, book: &BookId) -> Result<BookReviews, Error>;

    /// Review counts per star value for `book`.
    async fn rating_distribution(&self, book: &BookId) -> Result<RatingDistribution, Error>;
}

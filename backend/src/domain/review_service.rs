//! Review mutation guard and review reads.
//!
//! [`ReviewService`] implements [`ReviewCommand`] and [`ReviewQuery`]. Each
//! mutation checks the review invariants in a fixed order, commits, then asks
//! the [`RatingAggregator`] to refresh the affected book exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{
    BookRepository, BookReviews, CreateReviewRequest, DeleteReviewRequest, DeletedReview,
    ReviewCommand, ReviewQuery, ReviewRepository, UpdateReviewRequest, UserRepository,
};
use super::{
    BookId, Error, RatingAggregator, RatingDistribution, RatingSummary, Review, ReviewId,
    ReviewWithReviewer, UserId,
};

/// Review use-cases over the book, review and user repositories.
pub struct ReviewService<B, R, U> {
    aggregator: RatingAggregator<B, R>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<B, R, U> ReviewService<B, R, U> {
    /// Create a service that refreshes ratings through `aggregator`.
    pub fn new(aggregator: RatingAggregator<B, R>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            users,
            clock,
        }
    }
}

impl<B, R, U> ReviewService<B, R, U>
where
    B: BookRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    async fn require_review(&self, id: &ReviewId) -> Result<Review, Error> {
        self.aggregator
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("review not found"))
    }

    fn require_author(review: &Review, requester: UserId, action: &str) -> Result<(), Error> {
        if review.is_authored_by(requester) {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "you can only {action} your own reviews"
            )))
        }
    }

    async fn reviewer_names(
        &self,
        reviews: &[Review],
    ) -> Result<HashMap<UserId, super::UserName>, Error> {
        let mut ids: Vec<UserId> = reviews.iter().map(Review::user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let users = self.users.find_many(&ids).await?;
        Ok(users
            .into_iter()
            .map(|user| (user.id(), user.name().clone()))
            .collect())
    }
}

#[async_trait]
impl<B, R, U> ReviewCommand for ReviewService<B, R, U>
where
    B: BookRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateReviewRequest) -> Result<Review, Error> {
        let CreateReviewRequest {
            book_id,
            reviewer,
            fields,
        } = request;

        let book = self
            .aggregator
            .books()
            .find_by_id(&book_id)
            .await?
            .ok_or_else(|| Error::not_found("book not found"))?;
        if book.is_owned_by(reviewer) {
            return Err(Error::forbidden("you cannot review your own book"));
        }
        if self
            .aggregator
            .reviews()
            .find_by_book_and_user(&book_id, &reviewer)
            .await?
            .is_some()
        {
            return Err(Error::conflict("you have already reviewed this book"));
        }
        let draft = fields.into_draft()?;

        let review = Review::create(
            ReviewId::random(),
            book_id,
            reviewer,
            draft,
            self.clock.utc(),
        );
        self.aggregator.reviews().insert(&review).await?;
        info!(
            review_id = %review.id(),
            book_id = %book_id,
            user_id = %reviewer,
            rating = review.rating().stars(),
            "review created"
        );
        self.aggregator.refresh(&book_id).await;
        Ok(review)
    }

    async fn update(&self, request: UpdateReviewRequest) -> Result<Review, Error> {
        let UpdateReviewRequest {
            review_id,
            requester,
            fields,
        } = request;

        let existing = self.require_review(&review_id).await?;
        Self::require_author(&existing, requester, "update")?;
        let changes = fields.into_changes()?;

        let updated = existing.apply(changes, self.clock.utc());
        if !self.aggregator.reviews().update(&updated).await? {
            return Err(Error::not_found("review not found"));
        }
        info!(
            review_id = %review_id,
            book_id = %updated.book_id(),
            user_id = %requester,
            "review updated"
        );
        self.aggregator.refresh(&updated.book_id()).await;
        Ok(updated)
    }

    async fn delete(&self, request: DeleteReviewRequest) -> Result<DeletedReview, Error> {
        let DeleteReviewRequest {
            review_id,
            requester,
        } = request;

        let existing = self.require_review(&review_id).await?;
        Self::require_author(&existing, requester, "delete")?;

        let book_id = existing.book_id();
        if !self.aggregator.reviews().delete(&review_id).await? {
            return Err(Error::not_found("review not found"));
        }
        info!(
            review_id = %review_id,
            book_id = %book_id,
            user_id = %requester,
            "review deleted"
        );
        self.aggregator.refresh(&book_id).await;
        Ok(DeletedReview { review_id, book_id })
    }
}

#[async_trait]
impl<B, R, U> ReviewQuery for ReviewService<B, R, U>
where
    B: BookRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    async fn list_for_book(&self, book: &BookId) -> Result<BookReviews, Error> {
        let reviews = self.aggregator.reviews().list_by_book(book).await?;
        let ratings: Vec<_> = reviews.iter().map(Review::rating).collect();
        let summary = RatingSummary::from_ratings(&ratings);
        let mut names = self.reviewer_names(&reviews).await?;
        let reviews = reviews
            .into_iter()
            .map(|review| {
                let reviewer_name = names.remove(&review.user_id());
                ReviewWithReviewer {
                    review,
                    reviewer_name,
                }
            })
            .collect();
        Ok(BookReviews {
            reviews,
            total: summary.review_count,
            average_rating: summary.average_rating,
        })
    }

    async fn rating_distribution(&self, book: &BookId) -> Result<RatingDistribution, Error> {
        self.aggregator.distribution(book).await
    }
}

//! Rating aggregation.
//!
//! Keeps each book's denormalised `averageRating` and `reviewCount` equal to
//! the mean and count of its live reviews. [`RatingAggregator::recompute`] is
//! idempotent: it always rebuilds the aggregate from the full review set and
//! writes both fields in one atomic update.

use std::num::NonZeroU32;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::ports::{BookRepository, ReviewRepository};
use super::{BookId, Error, RatingDistribution, RatingSummary};

/// Attempts made by [`RatingAggregator::refresh`] when none is configured.
pub const DEFAULT_RECOMPUTE_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(1);

/// Outcome of [`RatingAggregator::reconcile_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Books whose aggregates were rewritten.
    pub recomputed: u64,
    /// Books whose recompute failed.
    pub failed: u64,
}

/// Recomputes book rating aggregates from the review store.
pub struct RatingAggregator<B, R> {
    books: Arc<B>,
    reviews: Arc<R>,
    attempts: NonZeroU32,
}

impl<B, R> Clone for RatingAggregator<B, R> {
    fn clone(&self) -> Self {
        Self {
            books: Arc::clone(&self.books),
            reviews: Arc::clone(&self.reviews),
            attempts: self.attempts,
        }
    }
}

impl<B, R> RatingAggregator<B, R> {
    /// Create an aggregator over the given repositories.
    pub const fn new(books: Arc<B>, reviews: Arc<R>) -> Self {
        Self {
            books,
            reviews,
            attempts: DEFAULT_RECOMPUTE_ATTEMPTS,
        }
    }

    /// Override how many times [`RatingAggregator::refresh`] tries before
    /// giving up.
    #[must_use]
    pub fn with_attempts(mut self, attempts: NonZeroU32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Shared book repository.
    pub const fn books(&self) -> &Arc<B> {
        &self.books
    }

    /// Shared review repository.
    pub const fn reviews(&self) -> &Arc<R> {
        &self.reviews
    }
}

impl<B, R> RatingAggregator<B, R>
where
    B: BookRepository,
    R: ReviewRepository,
{
    /// Aggregate of the live review set, without persisting it.
    ///
    /// # Errors
    ///
    /// Propagates review repository failures.
    pub async fn summarise(&self, book: &BookId) -> Result<RatingSummary, Error> {
        let ratings = self.reviews.ratings_for_book(book).await?;
        Ok(RatingSummary::from_ratings(&ratings))
    }

    /// Review counts per star value for `book`.
    ///
    /// # Errors
    ///
    /// Propagates review repository failures.
    pub async fn distribution(&self, book: &BookId) -> Result<RatingDistribution, Error> {
        let ratings = self.reviews.ratings_for_book(book).await?;
        Ok(RatingDistribution::from_ratings(&ratings))
    }

    /// Rebuild and persist the aggregate fields of `book`.
    ///
    /// Returns `None` when the book no longer exists, which is not an error:
    /// a cascade delete may race a review mutation.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn recompute(&self, book: &BookId) -> Result<Option<RatingSummary>, Error> {
        let summary = self.summarise(book).await?;
        if self.books.set_rating(book, summary).await? {
            debug!(
                book_id = %book,
                review_count = summary.review_count,
                average_rating_centi = summary.average_rating.hundredths(),
                "rating aggregates recomputed"
            );
            Ok(Some(summary))
        } else {
            debug!(book_id = %book, "book vanished before rating recompute");
            Ok(None)
        }
    }

    /// Recompute after a committed review mutation.
    ///
    /// Retries up to the configured number of attempts. A final failure is
    /// logged at `error` and swallowed: the mutation has already been
    /// committed and is still reported as successful. `reconcile-ratings`
    /// repairs any aggregate left stale this way.
    pub async fn refresh(&self, book: &BookId) -> Option<RatingSummary> {
        let attempts = self.attempts.get();
        let mut attempt = 1;
        loop {
            match self.recompute(book).await {
                Ok(summary) => return summary,
                Err(err) if attempt < attempts => {
                    warn!(book_id = %book, attempt, error = %err, "rating recompute failed; retrying");
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        book_id = %book,
                        attempts,
                        error = %err,
                        "rating recompute failed; aggregates are stale until reconciled"
                    );
                    return None;
                }
            }
        }
    }

    /// Recompute every book in the store.
    ///
    /// Individual failures are logged and counted rather than aborting the
    /// run.
    ///
    /// # Errors
    ///
    /// Returns an error only when the book identifiers cannot be listed.
    pub async fn reconcile_all(&self) -> Result<ReconcileReport, Error> {
        let ids = self.books.list_ids().await?;
        let mut report = ReconcileReport::default();
        for id in &ids {
            match self.recompute(id).await {
                Ok(Some(_)) => report.recomputed += 1,
                Ok(None) => {}
                Err(err) => {
                    error!(book_id = %id, error = %err, "reconcile failed for book");
                    report.failed += 1;
                }
            }
        }
        info!(
            books = ids.len(),
            recomputed = report.recomputed,
            failed = report.failed,
            "rating reconciliation finished"
        );
        Ok(report)
    }
}

//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! The `reviews_book_id_user_id_key` constraint closes the race between two
//! concurrent first reviews by the same user; its violation is reported as
//! [`ReviewRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{BookId, Rating, Review, ReviewId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{ReviewRow, RowError};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ReviewRepositoryError {
    map_pool_error(error, ReviewRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn row_error(error: RowError) -> ReviewRepositoryError {
    ReviewRepositoryError::query(error.to_string())
}

fn into_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>, ReviewRepositoryError> {
    rows.into_iter()
        .map(Review::try_from)
        .collect::<Result<_, _>>()
        .map_err(row_error)
}

fn to_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(reviews::table)
            .values(ReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match unique_violation(&error) {
                Some(_) => ReviewRepositoryError::duplicate(
                    review.book_id().to_string(),
                    review.user_id().to_string(),
                ),
                None => diesel_error(error),
            })
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ReviewRow> = reviews::table
            .find(*id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Review::try_from).transpose().map_err(row_error)
    }

    async fn find_by_book_and_user(
        &self,
        book: &BookId,
        user: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ReviewRow> = reviews::table
            .filter(reviews::book_id.eq(book.as_uuid()))
            .filter(reviews::user_id.eq(user.as_uuid()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Review::try_from).transpose().map_err(row_error)
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = ReviewRow::from(review);
        let updated = diesel::update(reviews::table.find(row.id))
            .set((
                reviews::rating.eq(row.rating),
                reviews::review_text.eq(&row.review_text),
                reviews::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(reviews::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_by_book(&self, book: &BookId) -> Result<u64, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(reviews::table.filter(reviews::book_id.eq(book.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(deleted))
    }

    async fn list_by_book(&self, book: &BookId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::book_id.eq(book.as_uuid()))
            .order_by((reviews::created_at.desc(), reviews::id.asc()))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_reviews(rows)
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::user_id.eq(user.as_uuid()))
            .order_by((reviews::created_at.desc(), reviews::id.asc()))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_reviews(rows)
    }

    async fn ratings_for_book(&self, book: &BookId) -> Result<Vec<Rating>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let stars: Vec<i16> = reviews::table
            .filter(reviews::book_id.eq(book.as_uuid()))
            .select(reviews::rating)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        stars
            .into_iter()
            .map(|value| {
                Rating::new(i64::from(value))
                    .map_err(|error| ReviewRepositoryError::query(error.to_string()))
            })
            .collect()
    }

    async fn count_by_book(&self, book: &BookId) -> Result<u64, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = reviews::table
            .filter(reviews::book_id.eq(book.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

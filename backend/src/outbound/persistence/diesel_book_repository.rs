//! PostgreSQL-backed `BookRepository` implementation using Diesel ORM.
//!
//! Listing mirrors the in-memory ordering: the requested sort key, then `id`
//! ascending. Title and author columns use byte-wise collation so string
//! ordering agrees with Rust's `str::cmp`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::PgTextExpressionMethods;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;
use uuid::Uuid;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{
    Book, BookId, BookListing, RatingSummary, SortDirection, SortField, SortKey, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookDetailsUpdate, BookRow, NewBookRow, RatingColumns, RowError};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the `BookRepository` port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BookRepositoryError {
    map_pool_error(error, BookRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BookRepositoryError {
    map_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

fn into_books(rows: Vec<BookRow>) -> Result<Vec<Book>, BookRepositoryError> {
    rows.into_iter()
        .map(Book::try_from)
        .collect::<Result<_, RowError>>()
        .map_err(|error| BookRepositoryError::query(error.to_string()))
}

/// Escape `%`, `_` and `\` so the term matches literally inside `ILIKE`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Books passing the listing's genre and search filters, unordered.
fn filtered(listing: &BookListing) -> books::BoxedQuery<'static, Pg> {
    let mut query = books::table.into_boxed();
    if let Some(genre) = listing.genre() {
        query = query.filter(books::genre.eq(genre.to_owned()));
    }
    if let Some(term) = listing.search() {
        let pattern = like_pattern(term.as_str());
        query = query.filter(
            books::title
                .ilike(pattern.clone())
                .or(books::author.ilike(pattern)),
        );
    }
    query
}

macro_rules! order_by_direction {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Ascending => $query.order_by($column.asc()),
            SortDirection::Descending => $query.order_by($column.desc()),
        }
    };
}

fn ordered(
    query: books::BoxedQuery<'static, Pg>,
    sort: SortKey,
) -> books::BoxedQuery<'static, Pg> {
    let direction = sort.direction();
    let primary = match sort.field() {
        SortField::Title => order_by_direction!(query, books::title, direction),
        SortField::Author => order_by_direction!(query, books::author, direction),
        SortField::Year => order_by_direction!(query, books::year, direction),
        SortField::AverageRating => {
            order_by_direction!(query, books::average_rating_centi, direction)
        }
        SortField::ReviewCount => order_by_direction!(query, books::review_count, direction),
        SortField::CreatedAt => order_by_direction!(query, books::created_at, direction),
    };
    primary.then_order_by(books::id.asc())
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn insert(&self, book: &Book) -> Result<(), BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(books::table)
            .values(NewBookRow::from_book(book))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<BookRow> = books::table
            .find(*id.as_uuid())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Book::try_from)
            .transpose()
            .map_err(|error| BookRepositoryError::query(error.to_string()))
    }

    async fn find_many(&self, ids: &[BookId]) -> Result<Vec<Book>, BookRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<BookRow> = books::table
            .filter(books::id.eq_any(raw))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_books(rows)
    }

    async fn update_details(&self, book: &Book) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(books::table.find(*book.id().as_uuid()))
            .set(BookDetailsUpdate::from_book(book))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_rating(
        &self,
        id: &BookId,
        rating: RatingSummary,
    ) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(books::table.find(*id.as_uuid()))
            .set(RatingColumns::from(rating))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &BookId) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(books::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(&self, listing: &BookListing) -> Result<Page<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = filtered(listing)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let request = listing.page();
        let rows: Vec<BookRow> = ordered(filtered(listing), listing.sort())
            .offset(to_i64(request.offset()))
            .limit(i64::from(request.limit()))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let total_items = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(into_books(rows)?, request, total_items))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BookRow> = books::table
            .filter(books::added_by.eq(owner.as_uuid()))
            .order_by((books::created_at.desc(), books::id.asc()))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        into_books(rows)
    }

    async fn list_ids(&self) -> Result<Vec<BookId>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = books::table
            .select(books::id)
            .order_by(books::id.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(BookId::from_uuid).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Query construction helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo", "%foo%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_pattern_escapes_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(term), expected);
    }
}

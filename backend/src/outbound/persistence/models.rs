//! Internal Diesel row structs and their conversions to domain types.
//!
//! Rows never leave the persistence layer. Stored values are re-validated on
//! the way out; a row that no longer satisfies the domain rules surfaces as a
//! [`RowError`] rather than a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AverageRating, Book, BookAuthor, BookDescription, BookDraft, BookId, BookTitle,
    EmailAddress, FieldValidationError, Genre, PasswordHash, PublicationYear, Rating,
    RatingSummary, Review, ReviewDraft, ReviewId, ReviewText, User, UserAccount, UserId, UserName,
};

use super::schema::{books, reviews, users};

/// A stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {source}")]
pub(crate) struct RowError {
    table: &'static str,
    id: Uuid,
    source: FieldValidationError,
}

impl RowError {
    fn wrap(table: &'static str, id: Uuid) -> impl FnOnce(FieldValidationError) -> Self {
        move |source| Self { table, id, source }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, RowError> {
        let wrap = || RowError::wrap("users", self.id);
        Ok(User::new(
            UserId::from_uuid(self.id),
            UserName::new(&self.name).map_err(wrap())?,
            EmailAddress::new(&self.email).map_err(wrap())?,
            self.created_at,
        ))
    }

    pub(crate) fn into_account(self) -> Result<UserAccount, RowError> {
        let password_hash = PasswordHash::new(self.password_hash.as_str());
        Ok(UserAccount {
            user: self.into_user()?,
            password_hash,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_account(account: &'a UserAccount) -> Self {
        Self {
            id: *account.user.id().as_uuid(),
            name: account.user.name().as_str(),
            email: account.user.email().as_str(),
            password_hash: account.password_hash.as_str(),
            created_at: account.user.created_at(),
        }
    }
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub year: i32,
    pub added_by: Uuid,
    pub average_rating_centi: i32,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = RowError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let wrap = || RowError::wrap("books", row.id);
        let draft = BookDraft {
            title: BookTitle::new(&row.title).map_err(wrap())?,
            author: BookAuthor::new(&row.author).map_err(wrap())?,
            description: BookDescription::new(&row.description).map_err(wrap())?,
            genre: Genre::new(&row.genre).map_err(wrap())?,
            year: PublicationYear::new(i64::from(row.year)).map_err(wrap())?,
        };
        let rating = RatingSummary {
            average_rating: AverageRating::from_hundredths(
                u16::try_from(row.average_rating_centi.max(0)).unwrap_or(u16::MAX),
            ),
            review_count: u64::try_from(row.review_count.max(0)).unwrap_or_default(),
        };
        Ok(Book::restore(
            BookId::from_uuid(row.id),
            draft,
            UserId::from_uuid(row.added_by),
            rating,
            row.created_at,
            row.updated_at,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub genre: &'a str,
    pub year: i32,
    pub added_by: Uuid,
    pub average_rating_centi: i32,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewBookRow<'a> {
    pub(crate) fn from_book(book: &'a Book) -> Self {
        let rating = RatingColumns::from(book.rating());
        Self {
            id: *book.id().as_uuid(),
            title: book.title().as_str(),
            author: book.author().as_str(),
            description: book.description().as_str(),
            genre: book.genre().as_str(),
            year: book.year().value(),
            added_by: *book.added_by().as_uuid(),
            average_rating_centi: rating.average_rating_centi,
            review_count: rating.review_count,
            created_at: book.created_at(),
            updated_at: book.updated_at(),
        }
    }
}

/// Editable columns; aggregates are deliberately absent.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookDetailsUpdate<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub genre: &'a str,
    pub year: i32,
    pub updated_at: DateTime<Utc>,
}

impl<'a> BookDetailsUpdate<'a> {
    pub(crate) fn from_book(book: &'a Book) -> Self {
        Self {
            title: book.title().as_str(),
            author: book.author().as_str(),
            description: book.description().as_str(),
            genre: book.genre().as_str(),
            year: book.year().value(),
            updated_at: book.updated_at(),
        }
    }
}

/// The two aggregate columns, written together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct RatingColumns {
    pub average_rating_centi: i32,
    pub review_count: i64,
}

impl From<RatingSummary> for RatingColumns {
    fn from(summary: RatingSummary) -> Self {
        Self {
            average_rating_centi: i32::from(summary.average_rating.hundredths()),
            review_count: i64::try_from(summary.review_count).unwrap_or(i64::MAX),
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: *review.id().as_uuid(),
            book_id: *review.book_id().as_uuid(),
            user_id: *review.user_id().as_uuid(),
            rating: i16::from(review.rating().stars()),
            review_text: review.review_text().as_str().to_owned(),
            created_at: review.created_at(),
            updated_at: review.updated_at(),
        }
    }
}

impl TryFrom<ReviewRow> for Review {
    type Error = RowError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let wrap = || RowError::wrap("reviews", row.id);
        let draft = ReviewDraft {
            rating: Rating::new(i64::from(row.rating)).map_err(wrap())?,
            review_text: ReviewText::new(&row.review_text).map_err(wrap())?,
        };
        Ok(Review::restore(
            ReviewId::from_uuid(row.id),
            BookId::from_uuid(row.book_id),
            UserId::from_uuid(row.user_id),
            draft,
            row.created_at,
            row.updated_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversions.
    use super::*;
    use crate::test_support::{sample_book, sample_review};
    use rstest::rstest;

    #[rstest]
    fn rating_columns_store_hundredths() {
        let columns = RatingColumns::from(RatingSummary {
            average_rating: AverageRating::from_hundredths(433),
            review_count: 3,
        });

        assert_eq!(
            columns,
            RatingColumns {
                average_rating_centi: 433,
                review_count: 3
            }
        );
    }

    #[rstest]
    fn review_row_converts_back() {
        let review = sample_review(BookId::random(), UserId::random(), 4);

        let restored = Review::try_from(ReviewRow::from(&review)).expect("valid row");

        assert_eq!(restored, review);
    }

    #[rstest]
    fn invalid_stored_rating_is_reported() {
        let review = sample_review(BookId::random(), UserId::random(), 4);
        let mut row = ReviewRow::from(&review);
        row.rating = 9;

        let err = Review::try_from(row).expect_err("rating out of range");

        assert!(err.to_string().contains("reviews"));
    }

    #[rstest]
    fn book_row_keeps_aggregates() {
        let book = sample_book(UserId::random());
        let insert = NewBookRow::from_book(&book);
        let row = BookRow {
            id: insert.id,
            title: insert.title.to_owned(),
            author: insert.author.to_owned(),
            description: insert.description.to_owned(),
            genre: insert.genre.to_owned(),
            year: insert.year,
            added_by: insert.added_by,
            average_rating_centi: 467,
            review_count: 3,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
        };

        let restored = Book::try_from(row).expect("valid row");

        assert_eq!(restored.rating().average_rating.hundredths(), 467);
        assert_eq!(restored.title(), book.title());
    }
}

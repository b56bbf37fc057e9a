//! Reviews written by users about books.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::validation::{bounded_text_type, uuid_id};
use super::{BookAuthor, BookId, BookTitle, FieldValidationError, Rating, UserId, UserName};

uuid_id! {
    /// Stable review identifier.
    pub struct ReviewId;
}

bounded_text_type! {
    /// Body of a review.
    pub struct ReviewText {
        field: "reviewText",
        min: 10,
        max: 2000,
    }
}

/// A user's rating and commentary on one book.
///
/// ## Invariants
/// - at most one review exists per `(book_id, user_id)`;
/// - `user_id` never equals the reviewed book's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = String, format = Uuid)]
    id: ReviewId,
    #[schema(value_type = String, format = Uuid)]
    book_id: BookId,
    #[schema(value_type = String, format = Uuid)]
    user_id: UserId,
    #[schema(value_type = u8, minimum = 1, maximum = 5)]
    rating: Rating,
    #[schema(value_type = String)]
    review_text: ReviewText,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Review {
    /// A freshly written review.
    #[must_use]
    pub fn create(
        id: ReviewId,
        book_id: BookId,
        user_id: UserId,
        draft: ReviewDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self::restore(id, book_id, user_id, draft, now, now)
    }

    /// Rebuild a stored review.
    #[must_use]
    pub fn restore(
        id: ReviewId,
        book_id: BookId,
        user_id: UserId,
        draft: ReviewDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let ReviewDraft {
            rating,
            review_text,
        } = draft;
        Self {
            id,
            book_id,
            user_id,
            rating,
            review_text,
            created_at,
            updated_at,
        }
    }

    /// Apply a validated partial edit, bumping `updated_at`.
    #[must_use]
    pub fn apply(mut self, changes: ReviewChanges, now: DateTime<Utc>) -> Self {
        if let Some(rating) = changes.rating {
            self.rating = rating;
        }
        if let Some(text) = changes.review_text {
            self.review_text = text;
        }
        self.updated_at = now;
        self
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Reviewed book.
    #[must_use]
    pub const fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Authoring user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Star rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Review body.
    #[must_use]
    pub const fn review_text(&self) -> &ReviewText {
        &self.review_text
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` wrote this review.
    #[must_use]
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// Validated fields of a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Star rating.
    pub rating: Rating,
    /// Review body.
    pub review_text: ReviewText,
}

/// Validated partial edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    /// Replacement rating.
    pub rating: Option<Rating>,
    /// Replacement body.
    pub review_text: Option<ReviewText>,
}

/// Raw review fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFields {
    /// Requested rating.
    pub rating: Option<i64>,
    /// Requested body text.
    pub review_text: Option<String>,
}

impl ReviewFields {
    /// Validate a complete new review.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field, rating first.
    pub fn into_draft(self) -> Result<ReviewDraft, FieldValidationError> {
        let rating = self
            .rating
            .ok_or(FieldValidationError::Required { field: "rating" })?;
        let text = self
            .review_text
            .ok_or(FieldValidationError::Required { field: "reviewText" })?;
        Ok(ReviewDraft {
            rating: Rating::new(rating)?,
            review_text: ReviewText::new(text)?,
        })
    }

    /// Validate only the supplied fields of an edit.
    ///
    /// # Errors
    ///
    /// Returns the first supplied field that fails validation.
    pub fn into_changes(self) -> Result<ReviewChanges, FieldValidationError> {
        Ok(ReviewChanges {
            rating: self.rating.map(Rating::new).transpose()?,
            review_text: self.review_text.map(ReviewText::new).transpose()?,
        })
    }
}

/// A review together with its author's display name, for book pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithReviewer {
    /// The review.
    #[serde(flatten)]
    pub review: Review,
    /// Author's display name, absent if the account no longer resolves.
    #[schema(value_type = Option<String>)]
    pub reviewer_name: Option<UserName>,
}

/// A review together with the reviewed book's title and author, for profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithBook {
    /// The review.
    #[serde(flatten)]
    pub review: Review,
    /// Title of the reviewed book, absent if the book has been removed.
    #[schema(value_type = Option<String>)]
    pub book_title: Option<BookTitle>,
    /// Author of the reviewed book, absent if the book has been removed.
    #[schema(value_type = Option<String>)]
    pub book_author: Option<BookAuthor>,
}

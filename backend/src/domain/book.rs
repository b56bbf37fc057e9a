//! Books in the catalogue and their validated fields.
//!
//! A book's aggregate rating fields are owned by the rating aggregator; no
//! client-facing input type carries them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{bounded_text_type, uuid_id};
use super::{FieldValidationError, RatingSummary, UserId};

uuid_id! {
    /// Stable book identifier.
    pub struct BookId;
}

bounded_text_type! {
    /// Book title.
    pub struct BookTitle {
        field: "title",
        min: 1,
        max: 200,
    }
}

bounded_text_type! {
    /// Author name as printed on the cover.
    pub struct BookAuthor {
        field: "author",
        min: 2,
        max: 100,
    }
}

bounded_text_type! {
    /// Free-text synopsis.
    pub struct BookDescription {
        field: "description",
        min: 10,
        max: 2000,
    }
}

bounded_text_type! {
    /// Genre label, matched exactly by the genre filter.
    pub struct Genre {
        field: "genre",
        min: 1,
        max: 50,
    }
}

/// Year of first publication, `1000..=2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct PublicationYear(i32);

impl PublicationYear {
    /// Earliest accepted year.
    pub const MIN: i32 = 1000;
    /// Latest accepted year.
    pub const MAX: i32 = 2025;

    /// Validate a raw year.
    ///
    /// # Errors
    ///
    /// Returns [`FieldValidationError::OutOfRange`] outside the accepted years.
    pub fn new(value: i64) -> Result<Self, FieldValidationError> {
        i32::try_from(value)
            .ok()
            .filter(|year| (Self::MIN..=Self::MAX).contains(year))
            .map(Self)
            .ok_or(FieldValidationError::OutOfRange {
                field: "year",
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
    }

    /// The year as an integer.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<PublicationYear> for i32 {
    fn from(value: PublicationYear) -> Self {
        value.0
    }
}

impl TryFrom<i64> for PublicationYear {
    type Error = FieldValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The client-editable fields of a book, all validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    /// Title.
    pub title: BookTitle,
    /// Author.
    pub author: BookAuthor,
    /// Synopsis.
    pub description: BookDescription,
    /// Genre label.
    pub genre: Genre,
    /// Publication year.
    pub year: PublicationYear,
}

/// Raw, possibly partial, book fields as received from a client.
///
/// Each supplied field is validated by [`BookFields::into_draft`] or
/// [`BookFields::into_changes`]; absent fields are either required (create) or
/// left untouched (update).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    /// Title text.
    pub title: Option<String>,
    /// Author text.
    pub author: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Genre text.
    pub genre: Option<String>,
    /// Publication year.
    pub year: Option<i64>,
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, FieldValidationError> {
    value.ok_or(FieldValidationError::Required { field })
}

impl BookFields {
    /// Validate a complete set of fields for a new book.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field in the order title, author,
    /// description, genre, year.
    pub fn into_draft(self) -> Result<BookDraft, FieldValidationError> {
        Ok(BookDraft {
            title: BookTitle::new(required("title", self.title)?)?,
            author: BookAuthor::new(required("author", self.author)?)?,
            description: BookDescription::new(required("description", self.description)?)?,
            genre: Genre::new(required("genre", self.genre)?)?,
            year: PublicationYear::new(required("year", self.year)?)?,
        })
    }

    /// Validate only the supplied fields of an update.
    ///
    /// # Errors
    ///
    /// Returns the first supplied field that fails validation.
    pub fn into_changes(self) -> Result<BookChanges, FieldValidationError> {
        Ok(BookChanges {
            title: self.title.map(BookTitle::new).transpose()?,
            author: self.author.map(BookAuthor::new).transpose()?,
            description: self.description.map(BookDescription::new).transpose()?,
            genre: self.genre.map(Genre::new).transpose()?,
            year: self.year.map(PublicationYear::new).transpose()?,
        })
    }
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    /// Replacement title.
    pub title: Option<BookTitle>,
    /// Replacement author.
    pub author: Option<BookAuthor>,
    /// Replacement description.
    pub description: Option<BookDescription>,
    /// Replacement genre.
    pub genre: Option<Genre>,
    /// Replacement year.
    pub year: Option<PublicationYear>,
}

/// A catalogue entry.
///
/// ## Invariants
/// - `rating` mirrors the live review set after every review mutation;
///   only [`Book::with_rating`] changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[schema(value_type = String, format = Uuid)]
    id: BookId,
    #[schema(value_type = String, example = "The Left Hand of Darkness")]
    title: BookTitle,
    #[schema(value_type = String, example = "Ursula K. Le Guin")]
    author: BookAuthor,
    #[schema(value_type = String)]
    description: BookDescription,
    #[schema(value_type = String, example = "Fiction")]
    genre: Genre,
    #[schema(value_type = i32, example = 1969)]
    year: PublicationYear,
    #[schema(value_type = String, format = Uuid)]
    added_by: UserId,
    #[serde(flatten)]
    rating: RatingSummary,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Book {
    /// A newly added book with zeroed aggregates.
    #[must_use]
    pub fn create(id: BookId, draft: BookDraft, added_by: UserId, now: DateTime<Utc>) -> Self {
        let BookDraft {
            title,
            author,
            description,
            genre,
            year,
        } = draft;
        Self {
            id,
            title,
            author,
            description,
            genre,
            year,
            added_by,
            rating: RatingSummary::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a stored book.
    #[must_use]
    pub fn restore(
        id: BookId,
        draft: BookDraft,
        added_by: UserId,
        rating: RatingSummary,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let BookDraft {
            title,
            author,
            description,
            genre,
            year,
        } = draft;
        Self {
            id,
            title,
            author,
            description,
            genre,
            year,
            added_by,
            rating,
            created_at,
            updated_at,
        }
    }

    /// Apply a validated partial update, bumping `updated_at`.
    #[must_use]
    pub fn apply(mut self, changes: BookChanges, now: DateTime<Utc>) -> Self {
        let BookChanges {
            title,
            author,
            description,
            genre,
            year,
        } = changes;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = author {
            self.author = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = genre {
            self.genre = value;
        }
        if let Some(value) = year {
            self.year = value;
        }
        self.updated_at = now;
        self
    }

    /// Replace the aggregate rating fields.
    #[must_use]
    pub fn with_rating(mut self, rating: RatingSummary) -> Self {
        self.rating = rating;
        self
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> BookId {
        self.id
    }

    /// Title.
    #[must_use]
    pub const fn title(&self) -> &BookTitle {
        &self.title
    }

    /// Author.
    #[must_use]
    pub const fn author(&self) -> &BookAuthor {
        &self.author
    }

    /// Synopsis.
    #[must_use]
    pub const fn description(&self) -> &BookDescription {
        &self.description
    }

    /// Genre label.
    #[must_use]
    pub const fn genre(&self) -> &Genre {
        &self.genre
    }

    /// Publication year.
    #[must_use]
    pub const fn year(&self) -> PublicationYear {
        self.year
    }

    /// The user who added the book.
    #[must_use]
    pub const fn added_by(&self) -> UserId {
        self.added_by
    }

    /// Denormalised rating aggregates.
    #[must_use]
    pub const fn rating(&self) -> RatingSummary {
        self.rating
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

    /// Whether `user` owns this book. Compares typed identifiers.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.added_by == user
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fields() -> BookFields {
        BookFields {
            title: Some("Kindred".to_owned()),
            author: Some("Octavia E. Butler".to_owned()),
            description: Some("A time-travel slave narrative.".to_owned()),
            genre: Some("Fiction".to_owned()),
            year: Some(1979),
        }
    }

    #[rstest]
    #[case(999, false)]
    #[case(1000, true)]
    #[case(2025, true)]
    #[case(2026, false)]
    fn year_bounds_are_inclusive(#[case] year: i64, #[case] accepted: bool) {
        assert_eq!(PublicationYear::new(year).is_ok(), accepted);
    }

    #[rstest]
    fn draft_requires_every_field(fields: BookFields) {
        let missing_genre = BookFields {
            genre: None,
            ..fields
        };
        let err = missing_genre.into_draft().expect_err("genre is required");
        assert_eq!(err, FieldValidationError::Required { field: "genre" });
    }

    #[rstest]
    #[case(BookFields { author: Some("X".to_owned()), ..BookFields::default() }, "author")]
    #[case(BookFields { description: Some("too short".to_owned()), ..BookFields::default() }, "description")]
    #[case(BookFields { title: Some(String::new()), ..BookFields::default() }, "title")]
    fn changes_validate_supplied_fields(#[case] input: BookFields, #[case] field: &str) {
        let err = input.into_changes().expect_err("invalid field");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn apply_keeps_unset_fields_and_aggregates(fields: BookFields) {
        let owner = UserId::random();
        let created = Utc::now();
        let book = Book::create(
            BookId::random(),
            fields.into_draft().expect("valid draft"),
            owner,
            created,
        );
        let changes = BookFields {
            year: Some(1980),
            ..BookFields::default()
        }
        .into_changes()
        .expect("valid changes");
        let later = created + chrono::TimeDelta::seconds(5);

        let updated = book.clone().apply(changes, later);

        assert_eq!(updated.year().value(), 1980);
        assert_eq!(updated.title(), book.title());
        assert_eq!(updated.rating(), RatingSummary::default());
        assert_eq!(updated.created_at(), created);
        assert_eq!(updated.updated_at(), later);
        assert!(updated.is_owned_by(owner));
        assert!(!updated.is_owned_by(UserId::random()));
    }

    #[rstest]
    fn serialises_flat_aggregate_fields(fields: BookFields) {
        let book = Book::create(
            BookId::random(),
            fields.into_draft().expect("valid draft"),
            UserId::random(),
            Utc::now(),
        );
        let value = serde_json::to_value(&book).expect("serialise book");
        assert_eq!(value["averageRating"], serde_json::json!(0.0));
        assert_eq!(value["reviewCount"], serde_json::json!(0));
        assert_eq!(value["year"], serde_json::json!(1979));
        assert!(value.get("addedBy").is_some());
    }
}

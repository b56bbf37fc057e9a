//! Book listing queries: pagination, free-text search, genre filter and sort.
//!
//! A [`BookListing`] is the validated, store-agnostic form of a `GET /books`
//! request. Adapters translate it into their own query language; the
//! in-memory store uses [`BookListing::matches`] and [`BookListing::compare`]
//! directly, and the SQL adapter mirrors the same ordering so results are
//! identical across stores.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pagination::PageRequest;

use super::{Book, Error, FieldValidationError};

/// Columns a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Title, byte-wise.
    Title,
    /// Author, byte-wise.
    Author,
    /// Publication year.
    Year,
    /// Denormalised average rating.
    AverageRating,
    /// Denormalised review count.
    ReviewCount,
    /// Creation timestamp.
    CreatedAt,
}

impl SortField {
    /// Public name used in the `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Year => "year",
            Self::AverageRating => "averageRating",
            Self::ReviewCount => "reviewCount",
            Self::CreatedAt => "createdAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// A whitelisted sort key.
///
/// Parsed from `field` or `-field`; a leading `-` means descending.
///
/// # Examples
/// ```
/// use bookshelf::domain::{SortDirection, SortField, SortKey};
///
/// let key: SortKey = "-year".parse().expect("known field");
/// assert_eq!(key.field(), SortField::Year);
/// assert_eq!(key.direction(), SortDirection::Descending);
/// assert!("-isbn".parse::<SortKey>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    field: SortField,
    direction: SortDirection,
}

impl SortKey {
    /// Sort applied when the client does not choose one: newest first.
    pub const DEFAULT: Self = Self {
        field: SortField::CreatedAt,
        direction: SortDirection::Descending,
    };

    /// Build a key from parts.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse an optional raw value; absent or blank yields [`SortKey::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldValidationError::InvalidFormat`] for unknown fields.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, FieldValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::DEFAULT),
            Some(value) => value.parse(),
        }
    }

    /// Sorted column.
    #[must_use]
    pub const fn field(self) -> SortField {
        self.field
    }

    /// Sort direction.
    #[must_use]
    pub const fn direction(self) -> SortDirection {
        self.direction
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for SortKey {
    type Err = FieldValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, name) = match s.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, s),
        };
        let field = match name {
            "title" => SortField::Title,
            "author" => SortField::Author,
            "year" => SortField::Year,
            "averageRating" => SortField::AverageRating,
            "reviewCount" => SortField::ReviewCount,
            "createdAt" => SortField::CreatedAt,
            _ => {
                return Err(FieldValidationError::InvalidFormat {
                    field: "sort",
                    reason: "unknown sort field",
                });
            }
        };
        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction == SortDirection::Descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

/// Case-insensitive substring search over title and author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Trim `raw`; blank input means "no search".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                raw: trimmed.to_owned(),
                folded: trimmed.to_lowercase(),
            })
        }
    }

    /// Trimmed term as typed by the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Whether `haystack` contains the term, ignoring case. Wildcard
    /// characters match literally.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }
}

/// Raw listing parameters as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListingParams {
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Free-text search.
    pub search: Option<String>,
    /// Exact genre filter.
    pub genre: Option<String>,
    /// Sort key, `field` or `-field`.
    pub sort: Option<String>,
}

/// A validated listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListing {
    page: PageRequest,
    search: Option<SearchTerm>,
    genre: Option<String>,
    sort: SortKey,
}

impl BookListing {
    /// Validate raw parameters, applying `default_limit` when none is given.
    ///
    /// Paging inputs never fail: zero values fall back to the defaults and an
    /// oversized `limit` is clamped.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request [`Error`] naming `sort` for an unknown field.
    pub fn from_params(params: BookListingParams, default_limit: u32) -> Result<Self, Error> {
        let BookListingParams {
            page,
            limit,
            search,
            genre,
            sort,
        } = params;
        let page_request = PageRequest::resolve(page, limit, default_limit);
        let sort_key = SortKey::parse_optional(sort.as_deref())?;
        let genre_filter = genre
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        Ok(Self {
            page: page_request,
            search: search.as_deref().and_then(SearchTerm::parse),
            genre: genre_filter,
            sort: sort_key,
        })
    }

    /// Page window to return.
    #[must_use]
    pub const fn page(&self) -> PageRequest {
        self.page
    }

    /// Search term, if any.
    #[must_use]
    pub const fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// Genre filter, if any.
    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Requested ordering.
    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Whether `book` passes the search and genre filters.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        let genre_ok = self
            .genre
            .as_deref()
            .is_none_or(|genre| book.genre().as_str() == genre);
        let search_ok = self.search.as_ref().is_none_or(|term| {
            term.matches(book.title().as_str()) || term.matches(book.author().as_str())
        });
        genre_ok && search_ok
    }

    /// Total order used for listing: the requested key, then id ascending.
    #[must_use]
    pub fn compare(&self, left: &Book, right: &Book) -> Ordering {
        let primary = match self.sort.field {
            SortField::Title => left.title().as_str().cmp(right.title().as_str()),
            SortField::Author => left.author().as_str().cmp(right.author().as_str()),
            SortField::Year => left.year().cmp(&right.year()),
            SortField::AverageRating => left
                .rating()
                .average_rating
                .cmp(&right.rating().average_rating),
            SortField::ReviewCount => left.rating().review_count.cmp(&right.rating().review_count),
            SortField::CreatedAt => left.created_at().cmp(&right.created_at()),
        };
        let directed = match self.sort.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        directed.then_with(|| left.id().cmp(&right.id()))
    }
}

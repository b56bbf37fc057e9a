//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities (users, books, reviews, ratings),
//! the use-case services that enforce the review invariants, and the ports
//! adapters implement. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Book, Review, User and their validated field types.
//! - RatingAggregator: keeps each book's aggregate rating consistent.
//! - BookListing: validated search, filter, sort and page request.
//! - *Service types implementing the driving ports in [`ports`].

mod account_service;
mod auth;
mod book;
mod book_listing;
mod book_service;
pub mod error;
pub mod ports;
mod profile_service;
mod rating;
mod rating_aggregator;
mod repository_errors;
mod review;
mod review_service;
mod trace_id;
mod user;
pub(crate) mod validation;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, Identity, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Password, PasswordHash,
    SignupDetails, UserAccount,
};
pub use self::book::{
    Book, BookAuthor, BookChanges, BookDescription, BookDraft, BookFields, BookId, BookTitle,
    Genre, PublicationYear,
};
pub use self::book_listing::{
    BookListing, BookListingParams, SearchTerm, SortDirection, SortField, SortKey,
};
pub use self::book_service::BookService;
pub use self::error::{Error, ErrorCode};
pub use self::profile_service::ProfileService;
pub use self::rating::{AverageRating, Rating, RatingDistribution, RatingSummary};
pub use self::rating_aggregator::{DEFAULT_RECOMPUTE_ATTEMPTS, RatingAggregator, ReconcileReport};
pub use self::review::{
    Review, ReviewChanges, ReviewDraft, ReviewFields, ReviewId, ReviewText, ReviewWithBook,
    ReviewWithReviewer,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EMAIL_MAX, EmailAddress, User, UserId, UserName};
pub use self::validation::FieldValidationError;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use bookshelf::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

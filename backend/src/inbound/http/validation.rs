//! Shape validation for path segments and query strings.
//!
//! Value rules (lengths, ranges) belong to the domain; this module only turns
//! raw text into the types handlers pass on, reporting
//! `{ "field", "value", "code" }` details on failure.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{BookId, Error, ReviewId};

/// Validation error codes for request shape failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeError {
    InvalidUuid,
}

impl ShapeError {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

fn shape_error(field: &str, value: &str, code: ShapeError, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        shape_error(
            field,
            value,
            ShapeError::InvalidUuid,
            format!("{field} must be a valid UUID"),
        )
    })
}

/// Parse a book identifier taken from the path.
pub(crate) fn book_id(field: &str, value: &str) -> Result<BookId, Error> {
    parse_uuid(field, value).map(BookId::from_uuid)
}

/// Parse a review identifier taken from the path.
pub(crate) fn review_id(field: &str, value: &str) -> Result<ReviewId, Error> {
    parse_uuid(field, value).map(ReviewId::from_uuid)
}

/// Read an optional count from the query string.
///
/// Blank, negative and non-numeric values count as absent so the caller's
/// default applies.
pub(crate) fn optional_count(value: Option<&str>) -> Option<u32> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<u32>().ok())
}

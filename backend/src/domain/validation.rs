//! Field-level validation shared by the domain value types.
//!
//! Every constrained input (titles, review text, ratings, emails) rejects bad
//! data with a [`FieldValidationError`] naming the offending field. Services
//! convert these into [`Error::invalid_field`] so clients receive
//! `details: {field, code}`.

use super::Error;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldValidationError {
    /// The field was absent or blank.
    #[error("{field} is required")]
    Required {
        /// Field name as exposed to clients.
        field: &'static str,
    },
    /// The field is shorter than allowed.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Field name as exposed to clients.
        field: &'static str,
        /// Minimum length in characters.
        min: usize,
    },
    /// The field is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name as exposed to clients.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },
    /// A numeric field lies outside its inclusive range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Field name as exposed to clients.
        field: &'static str,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// The field does not have the expected shape.
    #[error("{field} is not valid: {reason}")]
    InvalidFormat {
        /// Field name as exposed to clients.
        field: &'static str,
        /// Short human-readable explanation.
        reason: &'static str,
    },
}

impl FieldValidationError {
    /// Name of the rejected field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }

    /// Machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidFormat { .. } => "invalid_format",
        }
    }
}

impl From<FieldValidationError> for Error {
    fn from(value: FieldValidationError) -> Self {
        Self::invalid_field(value.field(), value.code(), value.to_string())
    }
}

/// Trim `value` and check its character count against `min..=max`.
///
/// # Errors
///
/// Returns [`FieldValidationError::Required`] for blank input when `min > 0`,
/// otherwise `TooShort`/`TooLong` for out-of-bounds lengths.
pub fn bounded_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() && min > 0 {
        return Err(FieldValidationError::Required { field });
    }
    let length = trimmed.chars().count();
    if length < min {
        return Err(FieldValidationError::TooShort { field, min });
    }
    if length > max {
        return Err(FieldValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Declare a trimmed, length-bounded string newtype.
macro_rules! bounded_text_type {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            field: $field:literal,
            min: $min:expr,
            max: $max:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Minimum length in characters after trimming.
            pub const MIN_CHARS: usize = $min;
            /// Maximum length in characters after trimming.
            pub const MAX_CHARS: usize = $max;

            /// Trim and validate `value`.
            ///
            /// # Errors
            ///
            /// Returns a [`FieldValidationError`](crate::domain::FieldValidationError)
            /// when the trimmed length is outside the permitted bounds.
            pub fn new(
                value: impl AsRef<str>,
            ) -> Result<Self, $crate::domain::FieldValidationError> {
                $crate::domain::validation::bounded_text(
                    $field,
                    value.as_ref(),
                    Self::MIN_CHARS,
                    Self::MAX_CHARS,
                )
                .map(Self)
            }

            /// Borrow the validated text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::FieldValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use bounded_text_type;

/// Declare a UUID-backed identifier newtype.
macro_rules! uuid_id {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

pub(crate) use uuid_id;

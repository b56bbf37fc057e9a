//! Registered users.
//!
//! A [`User`] is the public view of an account: it never carries the password
//! credential. The stored credential travels separately inside
//! [`UserAccount`](crate::domain::UserAccount).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::FieldValidationError;
use super::validation::{bounded_text_type, uuid_id};

uuid_id! {
    /// Stable user identifier.
    pub struct UserId;
}

bounded_text_type! {
    /// Display name chosen at signup.
    pub struct UserName {
        field: "name",
        min: 1,
        max: 50,
    }
}

/// Email address normalised to lowercase.
///
/// ## Invariants
/// - exactly one `@` with non-empty local and domain parts;
/// - no whitespace;
/// - lowercase.
///
/// # Examples
/// ```
/// use bookshelf::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

/// Longest accepted email address.
pub const EMAIL_MAX: usize = 254;

impl EmailAddress {
    /// Normalise and validate an email address.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldValidationError`] for blank, overlong or malformed
    /// addresses.
    pub fn new(value: impl AsRef<str>) -> Result<Self, FieldValidationError> {
        const FIELD: &str = "email";
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FieldValidationError::Required { field: FIELD });
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(FieldValidationError::TooLong {
                field: FIELD,
                max: EMAIL_MAX,
            });
        }
        let malformed = FieldValidationError::InvalidFormat {
            field: FIELD,
            reason: "expected local@domain",
        };
        if trimmed.chars().any(char::is_whitespace) {
            return Err(malformed);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_lowercase()))
            }
            _ => Err(malformed),
        }
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = FieldValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, format = Uuid)]
    id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    name: UserName,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub const fn new(
        id: UserId,
        name: UserName,
        email: EmailAddress,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Normalised email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Signup timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "ada@example.com")]
    #[case("  Ada@Example.COM\t", "ada@example.com")]
    #[case("first.last+tag@sub.example.org", "first.last+tag@sub.example.org")]
    fn email_is_trimmed_and_lowercased(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("", "required")]
    #[case("no-at-sign", "invalid_format")]
    #[case("@example.com", "invalid_format")]
    #[case("ada@", "invalid_format")]
    #[case("ada@@example.com", "invalid_format")]
    #[case("ada lovelace@example.com", "invalid_format")]
    fn malformed_emails_are_rejected(#[case] input: &str, #[case] code: &str) {
        let err = EmailAddress::new(input).expect_err("email should be rejected");
        assert_eq!(err.field(), "email");
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn user_name_bounds() {
        assert!(UserName::new("A").is_ok());
        assert!(UserName::new("x".repeat(50)).is_ok());
        assert_eq!(
            UserName::new("x".repeat(51)),
            Err(FieldValidationError::TooLong {
                field: "name",
                max: 50
            })
        );
        assert_eq!(
            UserName::new("  "),
            Err(FieldValidationError::Required { field: "name" })
        );
    }

    #[rstest]
    fn user_serialises_without_credentials() {
        let user = User::new(
            UserId::random(),
            UserName::new("Ada").expect("valid name"),
            EmailAddress::new("ada@example.com").expect("valid email"),
            Utc::now(),
        );
        let value = serde_json::to_value(&user).expect("serialise user");
        let keys: Vec<&str> = value
            .as_object()
            .expect("user is an object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 4);
        for key in ["id", "name", "email", "createdAt"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}

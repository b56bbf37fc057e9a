//! Authentication primitives: signup and login inputs, stored password
//! credentials, bearer tokens and the identity they assert.
//!
//! Plaintext passwords are held in [`Zeroizing`] buffers and never appear in
//! `Debug` output.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{EmailAddress, FieldValidationError, User, UserId, UserName};

/// Shortest password accepted at signup.
pub const PASSWORD_MIN: usize = 6;
/// Longest password accepted at signup.
pub const PASSWORD_MAX: usize = 128;

/// A plaintext password supplied by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password against the signup policy.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldValidationError`] when the password is blank, shorter
    /// than [`PASSWORD_MIN`] or longer than [`PASSWORD_MAX`] characters.
    pub fn new(value: &str) -> Result<Self, FieldValidationError> {
        const FIELD: &str = "password";
        if value.is_empty() {
            return Err(FieldValidationError::Required { field: FIELD });
        }
        let length = value.chars().count();
        if length < PASSWORD_MIN {
            return Err(FieldValidationError::TooShort {
                field: FIELD,
                min: PASSWORD_MIN,
            });
        }
        if length > PASSWORD_MAX {
            return Err(FieldValidationError::TooLong {
                field: FIELD,
                max: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Expose the plaintext for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated signup payload.
///
/// # Examples
/// ```
/// use bookshelf::domain::SignupDetails;
///
/// let details = SignupDetails::try_from_parts("Ada", "ADA@example.com", "secret1")
///     .expect("valid signup");
/// assert_eq!(details.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    name: UserName,
    email: EmailAddress,
    password: Password,
}

impl SignupDetails {
    /// Validate each field in turn; the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns the [`FieldValidationError`] of the first invalid field, in the
    /// order name, email, password.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// Requested display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Normalised email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to hash.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// Login payload.
///
/// The email is trimmed and lowercased but not otherwise validated: an
/// address that cannot exist simply fails to match an account.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Errors
    ///
    /// Returns [`FieldValidationError::Required`] when either field is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldValidationError> {
        let normalised = email.trim();
        if normalised.is_empty() {
            return Err(FieldValidationError::Required { field: "email" });
        }
        if password.is_empty() {
            return Err(FieldValidationError::Required { field: "password" });
        }
        Ok(Self {
            email: normalised.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stored password credential in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a password hasher.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A user together with their stored credential.
///
/// Only account and login flows see this type; read paths use [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Public user record.
    pub user: User,
    /// Stored password hash.
    pub password_hash: PasswordHash,
}

/// The identity asserted by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Authenticated user.
    pub user_id: UserId,
    /// Email recorded when the token was issued.
    pub email: EmailAddress,
}

impl Identity {
    /// Identity for `user`.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id(),
            email: user.email().clone(),
        }
    }
}

/// Opaque signed bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "email")]
    #[case("   ", "pw", "email")]
    #[case("user@example.com", "", "password")]
    fn login_requires_both_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("blank inputs must fail");
        assert_eq!(err.field(), field);
        assert_eq!(err.code(), "required");
    }

    #[rstest]
    fn login_email_is_normalised_and_password_kept_verbatim() {
        let creds = LoginCredentials::try_from_parts("  Ada@Example.com ", " pass word ")
            .expect("valid inputs");
        assert_eq!(creds.email(), "ada@example.com");
        assert_eq!(creds.password(), " pass word ");
    }

    #[rstest]
    #[case("12345", Some("too_short"))]
    #[case("123456", None)]
    #[case("", Some("required"))]
    fn password_policy(#[case] input: &str, #[case] expected_code: Option<&str>) {
        let result = Password::new(input);
        assert_eq!(result.as_ref().err().map(FieldValidationError::code), expected_code);
    }

    #[rstest]
    fn signup_reports_first_invalid_field() {
        let err = SignupDetails::try_from_parts("", "not-an-email", "123")
            .expect_err("invalid signup");
        assert_eq!(err.field(), "name");

        let err = SignupDetails::try_from_parts("Ada", "not-an-email", "123")
            .expect_err("invalid signup");
        assert_eq!(err.field(), "email");

        let err = SignupDetails::try_from_parts("Ada", "ada@example.com", "123")
            .expect_err("invalid signup");
        assert_eq!(err.field(), "password");
    }

    #[rstest]
    fn secrets_are_redacted_in_debug_output() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", "hunter22")
            .expect("valid inputs");
        let password = Password::new("hunter22").expect("valid password");
        let rendered = format!("{creds:?} {password:?} {:?}", AccessToken::new("tok"));
        assert!(!rendered.contains("hunter22"));
        assert!(!rendered.contains("tok\""));
    }
}

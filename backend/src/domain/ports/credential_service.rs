//! Port for issuing and verifying bearer credentials.
//!
//! Tokens are self-contained: verification needs no store lookup, only the
//! signing secret and a clock.

use crate::domain::{AccessToken, Identity};

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or verifying a token.
    pub enum CredentialError {
        /// The token is not in the expected encoding.
        Malformed => "token is malformed",
        /// The signature does not match the payload.
        BadSignature => "token signature is invalid",
        /// The token's expiry has passed.
        Expired => "token has expired",
        /// The token could not be produced.
        Issue { message: String } => "failed to issue token: {message}",
    }
}

/// Issues and verifies signed identity tokens.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialService: Send + Sync {
    /// Sign a token asserting `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Issue`] if the claims cannot be encoded.
    fn issue(&self, identity: &Identity) -> Result<AccessToken, CredentialError>;

    /// Check a presented token and recover the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] for malformed, forged or expired tokens.
    fn verify(&self, token: &str) -> Result<Identity, CredentialError>;
}

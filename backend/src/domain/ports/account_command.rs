//! Driving port for signup and login.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AccessToken, Error, LoginCredentials, SignupDetails, User};

/// A successful login: a bearer token and the public user it identifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    /// Signed bearer token.
    pub token: AccessToken,
    /// The authenticated user.
    pub user: User,
}

/// Account use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `duplicate_email` when the address is already registered.
    async fn signup(&self, details: SignupDetails) -> Result<User, Error>;

    /// Exchange an email and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `invalid_credentials` for an unknown email or wrong password,
    /// without distinguishing the two.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginSession, Error>;
}

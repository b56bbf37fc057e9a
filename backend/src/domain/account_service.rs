//! Signup and login.
//!
//! Unknown emails and wrong passwords produce the same error so callers
//! cannot tell which addresses are registered. An unknown email still pays
//! for one password verification, against a placeholder hash made by the
//! configured hasher, so response times do not reveal it either.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::ports::{
    AccountCommand, CredentialService, LoginSession, PasswordHasher, UserRepository,
};
use super::{
    EmailAddress, Error, Identity, LoginCredentials, Password, PasswordHash, SignupDetails, User,
    UserAccount, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const PLACEHOLDER_PASSWORD: &str = "placeholder-password-never-issued";

/// Account use-cases over the user store, credential issuer and hasher.
pub struct AccountService<U, C, H> {
    users: Arc<U>,
    credentials: Arc<C>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    placeholder: OnceCell<PasswordHash>,
}

impl<U, C, H> AccountService<U, C, H> {
    /// Create a new service.
    pub fn new(users: Arc<U>, credentials: Arc<C>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            credentials,
            hasher,
            clock,
            placeholder: OnceCell::new(),
        }
    }
}

impl<U, C, H> AccountService<U, C, H>
where
    H: PasswordHasher,
{
    /// Spend the same hashing work as a real login, then fail.
    async fn reject_unknown_email(&self, candidate: &str) -> Error {
        let placeholder = self
            .placeholder
            .get_or_try_init(|| async {
                let password = Password::new(PLACEHOLDER_PASSWORD)
                    .map_err(|err| Error::internal(err.to_string()))?;
                self.hasher
                    .hash(&password)
                    .await
                    .map_err(|err| Error::internal(err.to_string()))
            })
            .await;
        match placeholder {
            Ok(stored) => {
                if let Err(err) = self.hasher.verify(candidate, stored).await {
                    debug!(error = %err, "placeholder verification failed");
                }
                Error::invalid_credentials(INVALID_CREDENTIALS)
            }
            Err(err) => err,
        }
    }
}

#[async_trait]
impl<U, C, H> AccountCommand for AccountService<U, C, H>
where
    U: UserRepository,
    C: CredentialService,
    H: PasswordHasher,
{
    async fn signup(&self, details: SignupDetails) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(details.password())
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(
            UserId::random(),
            details.name().clone(),
            details.email().clone(),
            self.clock.utc(),
        );
        let account = UserAccount {
            user,
            password_hash,
        };
        self.users.insert(&account).await?;
        info!(user_id = %account.user.id(), "account created");
        Ok(account.user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginSession, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            debug!("login rejected: email is not a valid address");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };
        let Some(account) = self.users.find_by_email(&email).await? else {
            debug!("login rejected: no account for email");
            return Err(self.reject_unknown_email(credentials.password()).await);
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        if !matches {
            debug!(user_id = %account.user.id(), "login rejected: wrong password");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        let token = self
            .credentials
            .issue(&Identity::for_user(&account.user))
            .map_err(|err| Error::internal(err.to_string()))?;
        info!(user_id = %account.user.id(), "login succeeded");
        Ok(LoginSession {
            token,
            user: account.user,
        })
    }
}

//! Argon2id password hashing producing PHC strings.
//!
//! Argon2 is deliberately slow, so each call runs on Tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// [`PasswordHasher`] backed by Argon2id with a random salt per hash.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with the library's recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit memory (KiB), iteration and lane costs.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hash`] when the parameters are out of range.
    pub fn with_cost(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Argon2PasswordHasher {
    fn hash_blocking(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordHash::new(encoded.to_string()))
    }

    fn verify_blocking(&self, candidate: &str, stored: &PasswordHash) -> Result<bool, PasswordHashError> {
        let parsed = PhcString::new(stored.as_str())
            .map_err(|err| PasswordHashError::corrupt_hash(err.to_string()))?;
        match self.argon2.verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::corrupt_hash(err.to_string())),
        }
    }
}

fn join_failed(err: &task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task did not complete: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let hasher = self.clone();
        let password = password.clone();
        task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|err| join_failed(&err))?
    }

    async fn verify(&self, candidate: &str, stored: &PasswordHash) -> Result<bool, PasswordHashError> {
        let hasher = self.clone();
        let candidate = Zeroizing::new(candidate.to_owned());
        let stored = stored.clone();
        task::spawn_blocking(move || hasher.verify_blocking(&candidate, &stored))
            .await
            .map_err(|err| join_failed(&err))?
    }
}

#[cfg(test)]
mod tests {
    //! Hash and verify with cheap parameters.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(8, 1, 1).expect("valid parameters")
    }

    #[rstest]
    #[tokio::test]
    async fn correct_password_verifies(hasher: Argon2PasswordHasher) {
        let password = Password::new("correct horse").expect("valid password");
        let stored = hasher.hash(&password).await.expect("hash");

        assert!(stored.as_str().starts_with("$argon2id$"));
        assert_eq!(hasher.verify("correct horse", &stored).await, Ok(true));
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_does_not_verify(hasher: Argon2PasswordHasher) {
        let password = Password::new("correct horse").expect("valid password");
        let stored = hasher.hash(&password).await.expect("hash");

        assert_eq!(hasher.verify("battery staple", &stored).await, Ok(false));
    }

    #[rstest]
    #[tokio::test]
    async fn each_hash_uses_a_fresh_salt(hasher: Argon2PasswordHasher) {
        let password = Password::new("same-password").expect("valid password");

        let first = hasher.hash(&password).await.expect("hash");
        let second = hasher.hash(&password).await.expect("hash");

        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_stored_hash_is_reported(hasher: Argon2PasswordHasher) {
        let result = hasher
            .verify("anything", &PasswordHash::new("not a phc string"))
            .await;

        assert!(matches!(result, Err(PasswordHashError::CorruptHash { .. })));
    }

    #[rstest]
    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_thread_free(hasher: Argon2PasswordHasher) {
        let password = Password::new("correct horse").expect("valid password");
        let (tx, mut rx) = tokio::sync::oneshot::channel();
        let sibling = tokio::spawn(async move {
            let _ = tx.send(());
        });

        let stored = hasher.hash(&password).await.expect("hash");

        assert!(
            rx.try_recv().is_ok(),
            "sibling task should run while the hash is computed"
        );
        sibling.await.expect("sibling task");
        assert_eq!(hasher.verify("correct horse", &stored).await, Ok(true));
    }

    #[rstest]
    fn out_of_range_cost_is_rejected() {
        assert!(Argon2PasswordHasher::with_cost(0, 0, 0).is_err());
    }
}

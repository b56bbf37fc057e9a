//! Loading the token signing secret.
//!
//! The secret is read from the file named by `AUTH_SECRET_FILE`. Debug builds,
//! or any build with `AUTH_ALLOW_EPHEMERAL=1`, fall back to a random
//! per-process secret when the file cannot be read; tokens then stop
//! verifying after a restart. Release builds require at least
//! [`SECRET_MIN_LEN`] bytes.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

/// Variable naming the secret file.
pub const SECRET_FILE_ENV: &str = "AUTH_SECRET_FILE";
/// Variable permitting a random secret when the file is unreadable.
pub const ALLOW_EPHEMERAL_ENV: &str = "AUTH_ALLOW_EPHEMERAL";
/// Shortest secret accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/auth_secret";
const EPHEMERAL_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

/// Whether release-only checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Development build: missing secrets degrade to an ephemeral one.
    Debug,
    /// Release build: the secret file must exist and be long enough.
    Release,
}

impl BuildMode {
    /// Mode of the running binary.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Failures raised while loading the signing secret.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// The secret file could not be read.
    #[error("failed to read auth secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is shorter than release builds allow.
    #[error("auth secret at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The file was readable but empty.
    #[error("auth secret at {path} is empty")]
    Empty { path: PathBuf },
}

/// HMAC key material. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw key bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// A random secret for a single process lifetime.
    #[must_use]
    pub fn ephemeral() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Raw key bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Truncated SHA-256 of the key, safe to log.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::outbound::credentials::SigningSecret;
    ///
    /// let fingerprint = SigningSecret::new(vec![7; 32]).fingerprint();
    /// assert_eq!(fingerprint.len(), 16);
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.expose());
        hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&self.fingerprint()).finish()
    }
}

fn allow_ephemeral<E: Env>(env: &E) -> bool {
    env.string(ALLOW_EPHEMERAL_ENV)
        .is_some_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Load the signing secret named by the environment.
///
/// # Errors
///
/// Returns [`SecretError`] when the file is unreadable and no ephemeral
/// fallback applies, or when a release build finds a short or empty secret.
pub fn signing_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningSecret, SecretError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if length == 0 {
                return Err(SecretError::Empty { path });
            }
            if mode == BuildMode::Release && length < SECRET_MIN_LEN {
                return Err(SecretError::TooShort {
                    path,
                    length,
                    min_len: SECRET_MIN_LEN,
                });
            }
            Ok(SigningSecret::new(bytes.to_vec()))
        }
        Err(source) => {
            if mode == BuildMode::Debug || allow_ephemeral(env) {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using ephemeral auth secret; tokens will not survive a restart"
                );
                Ok(SigningSecret::ephemeral())
            } else {
                Err(SecretError::Read { path, source })
            }
        }
    }
}

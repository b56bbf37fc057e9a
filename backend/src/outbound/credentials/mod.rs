//! Credential adapters: signed bearer tokens (JWT), password hashing and the
//! signing secret they depend on.

mod argon2_hasher;
mod secret;
mod signed_token;

pub use argon2_hasher::Argon2PasswordHasher;
pub use secret::{
    ALLOW_EPHEMERAL_ENV, BuildMode, SECRET_FILE_ENV, SECRET_MIN_LEN, SecretError, SigningSecret,
    signing_secret_from_env,
};
pub use signed_token::JwtCredentialService;

//! HS256 JSON Web Tokens.
//!
//! Claims carry the user id, email, issue time and expiry (Unix seconds).
//! Signatures are checked by `jsonwebtoken`; expiry is checked against the
//! injected clock rather than the system time so tests can move it.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{CredentialError, CredentialService};
use crate::domain::{AccessToken, EmailAddress, Identity, UserId};

use super::SigningSecret;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    iat: i64,
    exp: i64,
}

/// [`CredentialService`] signing JWTs with a shared secret.
pub struct JwtCredentialService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtCredentialService {
    /// Issue tokens valid for `ttl`, timed by `clock`.
    pub fn new(secret: &SigningSecret, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
            validation,
            ttl,
            clock,
        }
    }
}

fn rejection(err: &jsonwebtoken::errors::Error) -> CredentialError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            CredentialError::bad_signature()
        }
        _ => CredentialError::malformed(),
    }
}

impl CredentialService for JwtCredentialService {
    fn issue(&self, identity: &Identity) -> Result<AccessToken, CredentialError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: *identity.user_id.as_uuid(),
            email: identity.email.as_ref().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|err| CredentialError::issue(err.to_string()))?;
        Ok(AccessToken::new(token))
    }

    fn verify(&self, token: &str) -> Result<Identity, CredentialError> {
        let claims = jsonwebtoken::decode::<Claims>(token.trim(), &self.decoding, &self.validation)
            .map_err(|err| rejection(&err))?
            .claims;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(CredentialError::expired());
        }
        let email = EmailAddress::new(&claims.email).map_err(|_| CredentialError::malformed())?;
        Ok(Identity {
            user_id: UserId::from_uuid(claims.sub),
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Issue/verify behaviour, tampering and expiry.
    use super::*;
    use crate::test_support::MutableClock;
    use rstest::{fixture, rstest};

    struct Tokens {
        service: JwtCredentialService,
        clock: Arc<MutableClock>,
        identity: Identity,
    }

    fn service_with(secret: u8, clock: Arc<MutableClock>) -> JwtCredentialService {
        JwtCredentialService::new(&SigningSecret::new(vec![secret; 32]), Duration::hours(1), clock)
    }

    #[fixture]
    fn tokens() -> Tokens {
        let clock = MutableClock::shared();
        let service = service_with(3, clock.clone());
        let identity = Identity {
            user_id: UserId::random(),
            email: EmailAddress::new("reader@example.com").expect("valid email"),
        };
        Tokens {
            service,
            clock,
            identity,
        }
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_identity(tokens: Tokens) {
        let token = tokens.service.issue(&tokens.identity).expect("issue");

        let verified = tokens.service.verify(token.as_str()).expect("verify");

        assert_eq!(verified, tokens.identity);
    }

    #[rstest]
    fn issued_tokens_are_hs256_jwts(tokens: Tokens) {
        let token = tokens.service.issue(&tokens.identity).expect("issue");

        let header = jsonwebtoken::decode_header(token.as_str()).expect("jwt header");

        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(token.as_str().split('.').count(), 3);
    }

    #[rstest]
    fn tokens_expire_after_the_ttl(tokens: Tokens) {
        let token = tokens.service.issue(&tokens.identity).expect("issue");

        tokens.clock.advance_seconds(3_599);
        assert!(tokens.service.verify(token.as_str()).is_ok());

        tokens.clock.advance_seconds(1);
        assert_eq!(
            tokens.service.verify(token.as_str()),
            Err(CredentialError::expired())
        );
    }

    #[rstest]
    fn altered_claims_fail_the_signature_check(tokens: Tokens) {
        let token = tokens.service.issue(&tokens.identity).expect("issue");
        let forged = Identity {
            user_id: UserId::random(),
            email: EmailAddress::new("intruder@example.com").expect("valid email"),
        };
        let forged_token = service_with(9, tokens.clock.clone())
            .issue(&forged)
            .expect("issue");
        let (forged_body, _) = forged_token.as_str().rsplit_once('.').expect("three parts");
        let (_, signature) = token.as_str().rsplit_once('.').expect("three parts");

        let result = tokens.service.verify(&format!("{forged_body}.{signature}"));

        assert_eq!(result, Err(CredentialError::bad_signature()));
    }

    #[rstest]
    fn tokens_from_another_secret_are_rejected(tokens: Tokens) {
        let other = service_with(9, tokens.clock.clone());
        let token = other.issue(&tokens.identity).expect("issue");

        assert_eq!(
            tokens.service.verify(token.as_str()),
            Err(CredentialError::bad_signature())
        );
    }

    #[rstest]
    #[case("")]
    #[case("no-separator")]
    #[case("abcd.not-base64")]
    #[case("a.b.c")]
    fn malformed_tokens_are_rejected(tokens: Tokens, #[case] raw: &str) {
        assert_eq!(tokens.service.verify(raw), Err(CredentialError::malformed()));
    }
}

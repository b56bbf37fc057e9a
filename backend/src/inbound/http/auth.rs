//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a signed-in user take an [`Authenticated`] argument;
//! extraction fails with `401 unauthorized` before the handler body runs when
//! the `Authorization` header is missing, not a bearer token, or does not
//! verify.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, Identity, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// The verified identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub Identity);

impl Authenticated {
    /// Authenticated user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authorization token required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    state
        .credentials
        .verify(token)
        .map(Authenticated)
        .map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized("invalid or expired token")
        })
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Header parsing and verification outcomes.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    use crate::domain::ports::CredentialError;
    use crate::inbound::http::test_utils::{TestPorts, sample_identity};

    async fn call_with(header: Option<&str>, ports: TestPorts) -> StatusCode {
        let app = test::init_service(
            App::new().app_data(ports.into_data()).route(
                "/whoami",
                web::get().to(|auth: Authenticated| async move {
                    HttpResponse::Ok().body(auth.user_id().to_string())
                }),
            ),
        )
        .await;
        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        test::call_service(&app, request.to_request()).await.status()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer "))]
    #[actix_web::test]
    async fn missing_or_foreign_scheme_is_unauthorised(#[case] header: Option<&str>) {
        let mut ports = TestPorts::default();
        ports.credentials.expect_verify().never();

        assert_eq!(call_with(header, ports).await, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_token_is_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .credentials
            .expect_verify()
            .withf(|token| token == "stale")
            .return_once(|_| Err(CredentialError::expired()));

        assert_eq!(
            call_with(Some("Bearer stale"), ports).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn verified_token_reaches_the_handler() {
        let identity = sample_identity();
        let mut ports = TestPorts::default();
        ports
            .credentials
            .expect_verify()
            .return_once(move |_| Ok(identity));

        assert_eq!(call_with(Some("Bearer good"), ports).await, StatusCode::OK);
    }
}

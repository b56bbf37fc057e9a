//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockAccountCommand, MockBookCommand, MockBookQuery, MockCredentialService, MockProfileQuery,
    MockReviewCommand, MockReviewQuery,
};
use crate::domain::{EmailAddress, Identity, UserId};

use super::state::{HttpState, HttpStatePorts};

/// Token accepted by [`TestPorts::accepting`].
pub const TEST_TOKEN: &str = "test-token";

/// Identity for an arbitrary signed-in reader.
pub fn sample_identity() -> Identity {
    Identity {
        user_id: UserId::random(),
        email: EmailAddress::new("reader@example.com").expect("valid email"),
    }
}

/// `Authorization` header value carrying [`TEST_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TEST_TOKEN}"))
}

/// One mock per port; set expectations, then convert into state.
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub profiles: MockProfileQuery,
    pub books: MockBookCommand,
    pub books_query: MockBookQuery,
    pub reviews: MockReviewCommand,
    pub reviews_query: MockReviewQuery,
    pub credentials: MockCredentialService,
}

impl TestPorts {
    /// Ports whose credential service accepts [`TEST_TOKEN`] as `identity`.
    pub fn accepting(identity: Identity) -> Self {
        let mut ports = Self::default();
        ports
            .credentials
            .expect_verify()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(identity.clone()));
        ports
    }

    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            profiles: Arc::new(self.profiles),
            books: Arc::new(self.books),
            books_query: Arc::new(self.books_query),
            reviews: Arc::new(self.reviews),
            reviews_query: Arc::new(self.reviews_query),
            credentials: Arc::new(self.credentials),
        })
    }

    /// State wrapped for `App::app_data`.
    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(self.into_state())
    }
}

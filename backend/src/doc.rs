//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api` handler plus the health probes. The
//! document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{
    BookReviews, DeletedBook, DeletedReview, LoginSession, Profile,
};
use crate::domain::{
    Book, ErrorCode, RatingDistribution, RatingSummary, Review, ReviewWithBook,
    ReviewWithReviewer, User,
};
use crate::inbound::http::accounts::{LoginRequest, SignupRequest};
use crate::inbound::http::books::{BookPage, BookRequest};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::reviews::ReviewRequest;

/// Name of the bearer-token security scheme.
pub const BEARER_SCHEME: &str = "bearer";

/// Registers the bearer-token scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bookshelf API",
        description = "Books, reviews and rating aggregates behind bearer-token accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::rating_distribution,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Book,
        BookPage,
        BookRequest,
        BookReviews,
        DeletedBook,
        DeletedReview,
        ErrorCode,
        ErrorEnvelope,
        LoginRequest,
        LoginSession,
        ProbeStatus,
        Profile,
        RatingDistribution,
        RatingSummary,
        Review,
        ReviewRequest,
        ReviewWithBook,
        ReviewWithReviewer,
        SignupRequest,
        User,
    )),
    tags(
        (name = "auth", description = "Signup, login and the caller's profile"),
        (name = "books", description = "The book catalogue"),
        (name = "reviews", description = "Reviews and rating statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Document structure.
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(object))) => object.properties.keys().cloned().collect(),
            Some(_) => panic!("{name} is not an inline object schema"),
            None => panic!("{name} is not registered as a component"),
        }
    }

    #[rstest]
    #[case("/api/auth/signup")]
    #[case("/api/auth/login")]
    #[case("/api/auth/profile")]
    #[case("/api/books")]
    #[case("/api/books/{id}")]
    #[case("/api/books/{bookId}/reviews")]
    #[case("/api/books/{bookId}/rating-distribution")]
    #[case("/api/reviews/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_envelope_lists_its_fields() {
        let fields = object_fields("ErrorEnvelope");
        for field in ["success", "error", "code", "statusCode", "traceId", "details"] {
            assert!(fields.iter().any(|name| name == field), "missing {field}");
        }
    }

    #[rstest]
    fn review_request_uses_camel_case() {
        let fields = object_fields("ReviewRequest");
        assert!(fields.iter().any(|name| name == "reviewText"));
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}

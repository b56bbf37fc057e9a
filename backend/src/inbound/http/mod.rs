//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers translate JSON into domain requests, call a driving port held in
//! [`HttpState`], and wrap the result in the success [`Envelope`]. Failures
//! surface as domain [`Error`](crate::domain::Error)s rendered by its
//! `ResponseError` implementation.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod books;
pub mod envelope;
pub mod error;
pub mod health;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

pub use crate::domain::ApiResult;
pub use auth::Authenticated;
pub use envelope::Envelope;
pub use error::{ErrorEnvelope, json_config, query_config};
pub use health::HealthState;
pub use state::{HttpState, HttpStatePorts};

/// Register every `/api` endpoint on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use bookshelf::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::profile)
        .service(books::list_books)
        .service(books::create_book)
        .service(books::get_book)
        .service(books::update_book)
        .service(books::delete_book)
        .service(reviews::create_review)
        .service(reviews::list_reviews)
        .service(reviews::rating_distribution)
        .service(reviews::update_review)
        .service(reviews::delete_review);
}

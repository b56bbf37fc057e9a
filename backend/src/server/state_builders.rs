//! Builders wiring repositories into services and services into HTTP state.

use std::num::NonZeroU32;
use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{BookRepository, ReviewRepository, UserRepository};
use crate::domain::{
    AccountService, BookService, ProfileService, RatingAggregator, ReviewService,
};
use crate::inbound::http::{HttpState, HttpStatePorts};
use crate::outbound::credentials::{Argon2PasswordHasher, JwtCredentialService};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DieselBookRepository, DieselReviewRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Shared collaborators every service set needs.
struct Collaborators {
    credentials: Arc<JwtCredentialService>,
    hasher: Arc<Argon2PasswordHasher>,
    clock: Arc<dyn Clock>,
    attempts: NonZeroU32,
}

fn build_ports<U, B, R>(
    users: Arc<U>,
    books: Arc<B>,
    reviews: Arc<R>,
    shared: Collaborators,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    B: BookRepository + 'static,
    R: ReviewRepository + 'static,
{
    let Collaborators {
        credentials,
        hasher,
        clock,
        attempts,
    } = shared;
    let aggregator =
        RatingAggregator::new(Arc::clone(&books), Arc::clone(&reviews)).with_attempts(attempts);
    let review_service = Arc::new(ReviewService::new(
        aggregator,
        Arc::clone(&users),
        Arc::clone(&clock),
    ));
    let book_service = Arc::new(BookService::new(
        Arc::clone(&books),
        Arc::clone(&reviews),
        Arc::clone(&clock),
    ));
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        Arc::clone(&credentials),
        hasher,
        clock,
    ));
    let profiles = Arc::new(ProfileService::new(users, books, reviews));

    HttpStatePorts {
        accounts,
        profiles,
        books: book_service.clone(),
        books_query: book_service,
        reviews: review_service.clone(),
        reviews_query: review_service,
        credentials,
    }
}

/// Assemble handler state from the configuration.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let shared = Collaborators {
        credentials: Arc::new(JwtCredentialService::new(
            &config.secret,
            config.token_ttl,
            Arc::clone(&config.clock),
        )),
        hasher: Arc::new(config.hasher.clone()),
        clock: Arc::clone(&config.clock),
        attempts: config.recompute_attempts,
    };
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselBookRepository::new(pool.clone())),
            Arc::new(DieselReviewRepository::new(pool.clone())),
            shared,
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            build_ports(Arc::clone(&store), Arc::clone(&store), store, shared)
        }
    };
    HttpState::new(ports).with_default_page_limit(config.default_page_limit)
}

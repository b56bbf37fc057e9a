//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, credential service, password hasher) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod book_command;
mod book_query;
mod book_repository;
mod credential_service;
mod password_hasher;
mod profile_query;
mod review_command;
mod review_query;
mod review_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginSession};
#[cfg(test)]
pub use book_command::MockBookCommand;
pub use book_command::{
    BookCommand, CreateBookRequest, DeleteBookRequest, DeletedBook, UpdateBookRequest,
};
#[cfg(test)]
pub use book_query::MockBookQuery;
pub use book_query::BookQuery;
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError};
#[cfg(test)]
pub use credential_service::MockCredentialService;
pub use credential_service::{CredentialError, CredentialService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{Profile, ProfileQuery};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::{
    CreateReviewRequest, DeleteReviewRequest, DeletedReview, ReviewCommand, UpdateReviewRequest,
};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::{BookReviews, ReviewQuery};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

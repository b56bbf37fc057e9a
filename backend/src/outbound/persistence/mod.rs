//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.
//!
//! Row structs and the table definitions stay private to this module; the
//! repositories convert to and from domain types at the boundary and map
//! Diesel failures onto the port error enums. Uniqueness of user emails and of
//! one review per (book, user) is enforced by database constraints.
//!
//! ```no_run
//! use bookshelf::outbound::persistence::{DbPool, DieselBookRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bookshelf")).await?;
//! let _books = DieselBookRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_book_repository;
mod diesel_error_mapping;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};

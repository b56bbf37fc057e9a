//! Shared Diesel error mapping for the bookshelf repositories.
//!
//! Each repository supplies its own `query`/`connection` constructors; unique
//! violations are detected separately so callers can map them to the
//! constraint-specific port error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(super) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    debug!(%message, "database pool checkout failed");
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
pub(super) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}

/// Name of the violated unique constraint, when `error` is one.
pub(super) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Error classification.
    use super::*;
    use crate::domain::ports::BookRepositoryError;
    use rstest::rstest;

    fn map(error: DieselError) -> BookRepositoryError {
        map_diesel_error(error, BookRepositoryError::query, BookRepositoryError::connection)
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert!(matches!(
            map(DieselError::NotFound),
            BookRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn broken_transaction_manager_is_a_connection_error() {
        assert!(matches!(
            map(DieselError::BrokenTransactionManager),
            BookRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn pool_checkout_is_a_connection_error() {
        let err = map_pool_error(
            PoolError::checkout("timed out"),
            BookRepositoryError::connection,
        );

        assert_eq!(err, BookRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn non_database_errors_are_not_unique_violations() {
        assert_eq!(unique_violation(&DieselError::NotFound), None);
    }
}

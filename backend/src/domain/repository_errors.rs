//! Mapping from driven-port errors to domain errors.
//!
//! Connection failures surface as `service_unavailable`; query failures as
//! `internal_error`. Uniqueness violations map to the conflict codes clients
//! rely on.

use super::Error;
use super::ports::{BookRepositoryError, ReviewRepositoryError, UserRepositoryError};

impl From<UserRepositoryError> for Error {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Self::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail { .. } => {
                Self::duplicate_email("an account with this email already exists")
            }
        }
    }
}

impl From<BookRepositoryError> for Error {
    fn from(error: BookRepositoryError) -> Self {
        match error {
            BookRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("book repository unavailable: {message}"))
            }
            BookRepositoryError::Query { message } => {
                Self::internal(format!("book repository error: {message}"))
            }
        }
    }
}

impl From<ReviewRepositoryError> for Error {
    fn from(error: ReviewRepositoryError) -> Self {
        match error {
            ReviewRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("review repository unavailable: {message}"))
            }
            ReviewRepositoryError::Query { message } => {
                Self::internal(format!("review repository error: {message}"))
            }
            ReviewRepositoryError::Duplicate { .. } => {
                Self::conflict("you have already reviewed this book")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserRepositoryError::connection("refused").into(), ErrorCode::ServiceUnavailable)]
    #[case(UserRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
    #[case(UserRepositoryError::duplicate_email("a@b.c").into(), ErrorCode::DuplicateEmail)]
    #[case(BookRepositoryError::connection("refused").into(), ErrorCode::ServiceUnavailable)]
    #[case(BookRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
    #[case(ReviewRepositoryError::duplicate("b", "u").into(), ErrorCode::Conflict)]
    #[case(ReviewRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
    fn port_errors_map_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }
}

//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserAccount, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{NewUserRow, RowError, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_error(error: RowError) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from_account(account))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match unique_violation(&error) {
                Some(_) => UserRepositoryError::duplicate_email(account.user.email().as_str()),
                None => diesel_error(error),
            })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(UserRow::into_account).transpose().map_err(row_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(UserRow::into_user).transpose().map_err(row_error)
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(raw))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(UserRow::into_user)
            .collect::<Result<_, _>>()
            .map_err(row_error)
    }
}

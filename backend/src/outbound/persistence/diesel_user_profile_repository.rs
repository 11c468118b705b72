//! PostgreSQL-backed `UserProfileRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{Email, ExternalId, ProfileId, UserProfile};

use super::diesel_helpers::{DbFailure, classify_diesel_error, classify_pool_error, fetch_optional};
use super::models::{NewUserProfileRow, UserProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_profiles;

/// Diesel-backed implementation of the `UserProfileRepository` port.
///
/// Uniqueness of `external_id` and `email` is enforced by the database;
/// violations surface as [`UserProfileRepositoryError::Duplicate`] carrying
/// the constraint name.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: DbFailure) -> UserProfileRepositoryError {
    match failure {
        DbFailure::Connection(message) => UserProfileRepositoryError::connection(message),
        DbFailure::UniqueViolation { constraint } => {
            UserProfileRepositoryError::duplicate(constraint)
        }
        DbFailure::Query(message) => UserProfileRepositoryError::query(message),
    }
}

fn pool_error(error: PoolError) -> UserProfileRepositoryError {
    to_port_error(classify_pool_error(error))
}

fn diesel_error(error: diesel::result::Error) -> UserProfileRepositoryError {
    to_port_error(classify_diesel_error(error))
}

fn to_domain(
    row: Option<UserProfileRow>,
) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
    row.map(UserProfile::try_from)
        .transpose()
        .map_err(UserProfileRepositoryError::query)
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find_by_id(
        &self,
        id: &ProfileId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let row = fetch_optional!(
            self.pool,
            user_profiles::table.filter(user_profiles::id.eq(*id.as_uuid())),
            UserProfileRow,
            pool_error,
            diesel_error
        );
        to_domain(row)
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let row = fetch_optional!(
            self.pool,
            user_profiles::table.filter(user_profiles::external_id.eq(external_id.as_ref())),
            UserProfileRow,
            pool_error,
            diesel_error
        );
        to_domain(row)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let row = fetch_optional!(
            self.pool,
            user_profiles::table.filter(user_profiles::email.eq(email.as_ref())),
            UserProfileRow,
            pool_error,
            diesel_error
        );
        to_domain(row)
    }

    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserProfileRow::from(profile);
        diesel::insert_into(user_profiles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn link_external_id(
        &self,
        id: &ProfileId,
        external_id: &ExternalId,
    ) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserProfileRow> = diesel::update(
            user_profiles::table
                .filter(user_profiles::id.eq(*id.as_uuid()))
                .filter(user_profiles::external_id.is_null()),
        )
        .set(user_profiles::external_id.eq(external_id.as_ref()))
        .returning(UserProfileRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        to_domain(row)
    }
}

//! PostgreSQL-backed `PropertyRepository` implementation using Diesel ORM.
//!
//! Status changes are a single conditional `UPDATE ... WHERE status =
//! expected`; zero affected rows means a concurrent writer got there first.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PropertyRepository, PropertyRepositoryError};
use crate::domain::{ProfileId, Property, PropertyId, PropertyStatus, ShortCode};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, classify_pool_error, convert_rows, fetch_all,
    fetch_optional,
};
use super::models::{NewPropertyRow, PropertyRow};
use super::pool::{DbPool, PoolError};
use super::schema::properties;

const SHORT_CODE_CONSTRAINT: &str = "properties_short_code_key";

/// Diesel-backed implementation of the `PropertyRepository` port.
#[derive(Clone)]
pub struct DieselPropertyRepository {
    pool: DbPool,
}

impl DieselPropertyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: DbFailure) -> PropertyRepositoryError {
    match failure {
        DbFailure::Connection(message) => PropertyRepositoryError::connection(message),
        DbFailure::UniqueViolation { constraint } => {
            PropertyRepositoryError::query(format!("unique violation on {constraint}"))
        }
        DbFailure::Query(message) => PropertyRepositoryError::query(message),
    }
}

fn pool_error(error: PoolError) -> PropertyRepositoryError {
    to_port_error(classify_pool_error(error))
}

fn diesel_error(error: diesel::result::Error) -> PropertyRepositoryError {
    to_port_error(classify_diesel_error(error))
}

#[async_trait]
impl PropertyRepository for DieselPropertyRepository {
    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<Property>, PropertyRepositoryError> {
        let row = fetch_optional!(
            self.pool,
            properties::table.filter(properties::short_code.eq(code.as_ref())),
            PropertyRow,
            pool_error,
            diesel_error
        );
        row.map(Property::try_from)
            .transpose()
            .map_err(PropertyRepositoryError::query)
    }

    async fn list_by_owner(
        &self,
        owner_id: &ProfileId,
    ) -> Result<Vec<Property>, PropertyRepositoryError> {
        let rows = fetch_all!(
            self.pool,
            properties::table
                .filter(properties::owner_id.eq(*owner_id.as_uuid()))
                .order_by((properties::created_at.desc(), properties::id.desc())),
            PropertyRow,
            pool_error,
            diesel_error
        );
        convert_rows(rows).map_err(PropertyRepositoryError::query)
    }

    async fn insert(&self, property: &Property) -> Result<(), PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewPropertyRow::from(property);
        let result = diesel::insert_into(properties::table)
            .values(&row)
            .execute(&mut conn)
            .await;
        match result.map_err(classify_diesel_error) {
            Ok(_) => Ok(()),
            Err(DbFailure::UniqueViolation { constraint })
                if constraint == SHORT_CODE_CONSTRAINT =>
            {
                Err(PropertyRepositoryError::duplicate_short_code(
                    property.short_code.to_string(),
                ))
            }
            Err(failure) => Err(to_port_error(failure)),
        }
    }

    async fn compare_and_set_status(
        &self,
        id: &PropertyId,
        expected: PropertyStatus,
        next: PropertyStatus,
    ) -> Result<bool, PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            properties::table
                .filter(properties::id.eq(*id.as_uuid()))
                .filter(properties::status.eq(expected.as_str())),
        )
        .set(properties::status.eq(next.as_str()))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated == 1)
    }
}

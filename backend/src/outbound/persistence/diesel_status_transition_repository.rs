//! PostgreSQL-backed `StatusTransitionRepository` implementation.
//!
//! Insert-only; a trigger in the schema also rejects updates and deletes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StatusTransitionRepository, StatusTransitionRepositoryError};
use crate::domain::{PropertyId, StatusTransition};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, classify_pool_error, convert_rows, fetch_all,
};
use super::models::{NewStatusTransitionRow, StatusTransitionRow};
use super::pool::{DbPool, PoolError};
use super::schema::property_status_transitions;

/// Diesel-backed implementation of the `StatusTransitionRepository` port.
#[derive(Clone)]
pub struct DieselStatusTransitionRepository {
    pool: DbPool,
}

impl DieselStatusTransitionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: DbFailure) -> StatusTransitionRepositoryError {
    match failure {
        DbFailure::Connection(message) => StatusTransitionRepositoryError::connection(message),
        DbFailure::UniqueViolation { constraint } => {
            StatusTransitionRepositoryError::query(format!("unique violation on {constraint}"))
        }
        DbFailure::Query(message) => StatusTransitionRepositoryError::query(message),
    }
}

fn pool_error(error: PoolError) -> StatusTransitionRepositoryError {
    to_port_error(classify_pool_error(error))
}

fn diesel_error(error: diesel::result::Error) -> StatusTransitionRepositoryError {
    to_port_error(classify_diesel_error(error))
}

#[async_trait]
impl StatusTransitionRepository for DieselStatusTransitionRepository {
    async fn append(
        &self,
        transition: &StatusTransition,
    ) -> Result<(), StatusTransitionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewStatusTransitionRow::from(transition);
        diesel::insert_into(property_status_transitions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<StatusTransition>, StatusTransitionRepositoryError> {
        let rows = fetch_all!(
            self.pool,
            property_status_transitions::table
                .filter(property_status_transitions::property_id.eq(*property_id.as_uuid()))
                .order_by((
                    property_status_transitions::occurred_at.asc(),
                    property_status_transitions::id.asc(),
                )),
            StatusTransitionRow,
            pool_error,
            diesel_error
        );
        convert_rows(rows).map_err(StatusTransitionRepositoryError::query)
    }
}

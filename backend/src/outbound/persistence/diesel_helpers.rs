//! Shared error classification for Diesel repository implementations.
//!
//! Repositories classify pool and Diesel failures into [`DbFailure`] and
//! then map that onto their own port error enum. Unique violations keep the
//! constraint name so adapters can tell a short-code collision from other
//! duplicates.

use tracing::debug;

use super::pool::PoolError;

/// Failure class shared by every repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// Checkout failed, the connection dropped or a query timed out.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: String },
    /// Anything else.
    Query(String),
}

/// Postgres cancels statements that exceed the connection's
/// `statement_timeout` with this message.
const STATEMENT_TIMEOUT_MESSAGE: &str = "canceling statement due to statement timeout";

/// Classify a pool failure; all pool failures are connectivity problems.
pub(crate) fn classify_pool_error(error: PoolError) -> DbFailure {
    DbFailure::Connection(error.to_string())
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DbFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

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
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation {
                constraint: info.constraint_name().unwrap_or("unknown").to_owned(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(_, info)
            if info.message().contains(STATEMENT_TIMEOUT_MESSAGE) =>
        {
            DbFailure::Connection("database statement timed out".to_owned())
        }
        DieselError::DatabaseError(_, info) => DbFailure::Query(info.message().to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}

/// Convert rows with `TryFrom`, failing on the first corrupt row.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, String>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Fetch at most one row.
///
/// Expands to an expression of type `Option<$row>`; errors are mapped with
/// the supplied functions and returned with `?`. Callers must have
/// `diesel::prelude::*` and `diesel_async::RunQueryDsl` in scope. The query
/// deadline is the connection's `statement_timeout`.
macro_rules! fetch_optional {
    ($pool:expr, $query:expr, $row:ty, $pool_err:path, $diesel_err:path) => {{
        let mut conn = $pool.get().await.map_err($pool_err)?;
        let row: Option<$row> = $query
            .select(<$row>::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err($diesel_err)?;
        row
    }};
}

pub(crate) use fetch_optional;

/// Load every matching row, in the query's order. Same calling convention
/// as [`fetch_optional`].
macro_rules! fetch_all {
    ($pool:expr, $query:expr, $row:ty, $pool_err:path, $diesel_err:path) => {{
        let mut conn = $pool.get().await.map_err($pool_err)?;
        let rows: Vec<$row> = $query
            .select(<$row>::as_select())
            .load(&mut conn)
            .await
            .map_err($diesel_err)?;
        rows
    }};
}

pub(crate) use fetch_all;

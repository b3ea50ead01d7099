//! Shared Diesel error mapping for repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// A constraint violation detected at write time, after the pre-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WriteViolation {
    /// A referenced row disappeared between check and insert.
    ForeignKey { constraint: String },
    /// A uniqueness race: another writer claimed the value first.
    Unique { constraint: String },
}

/// Classify integrity violations so adapters can surface them as the client
/// errors the pre-checks would have produced.
pub(crate) fn detect_write_violation(error: &DieselError) -> Option<WriteViolation> {
    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    let constraint = info.constraint_name().unwrap_or("unknown").to_owned();
    match kind {
        DatabaseErrorKind::ForeignKeyViolation => Some(WriteViolation::ForeignKey { constraint }),
        DatabaseErrorKind::UniqueViolation => Some(WriteViolation::Unique { constraint }),
        _ => None,
    }
}

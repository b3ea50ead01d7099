//! PostgreSQL-backed `UserRegistry` implementation using Diesel.

use async_trait::async_trait;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{Page, UserRegistry, UserRegistryError};
use crate::domain::{AuditAction, AuditEvent, NewUser, USERS_ENTITY, User, UserId};

use super::audit::append_event;
use super::error_mapping::{
    WriteViolation, detect_write_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user registry port.
#[derive(Clone)]
pub struct DieselUserRegistry {
    pool: DbPool,
}

impl DieselUserRegistry {
    /// Create a new registry with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRegistryError {
    map_basic_pool_error(error, UserRegistryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRegistryError {
    map_basic_diesel_error(
        error,
        UserRegistryError::query,
        UserRegistryError::connection,
    )
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRegistryError> {
    let UserRow {
        id,
        email,
        full_name,
        created_at,
    } = row;
    User::from_parts(UserId::new(id), email, full_name, created_at)
        .map_err(|err| UserRegistryError::query(err.to_string()))
}

#[async_trait]
impl UserRegistry for DieselUserRegistry {
    async fn create(&self, user: &NewUser) -> Result<User, UserRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            email: user.email(),
            full_name: user.full_name(),
        };

        let inserted: Result<UserRow, diesel::result::Error> = conn
            .transaction(|conn| {
                async move {
                    let inserted: UserRow = diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let event = AuditEvent::new(
                        Some(UserId::new(inserted.id)),
                        USERS_ENTITY,
                        AuditAction::Create,
                    )
                    .for_entity_id(inserted.id);
                    append_event(conn, &event).await?;
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await;

        let inserted = inserted.map_err(|error| {
            if let Some(WriteViolation::Unique { .. }) = detect_write_violation(&error) {
                UserRegistryError::duplicate_email(user.email())
            } else {
                map_diesel_error(error)
            }
        })?;

        row_to_user(inserted)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(user_id.get()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, UserRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn exists(&self, user_id: UserId) -> Result<bool, UserRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        select(exists(users::table.filter(users::id.eq(user_id.get()))))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn row_conversion_rejects_corrupt_email() {
        let row = UserRow {
            id: 1,
            email: "not-an-email".to_owned(),
            full_name: None,
            created_at: Utc::now(),
        };
        let error = row_to_user(row).expect_err("corrupt email");
        assert!(matches!(error, UserRegistryError::Query { .. }));
    }

    #[rstest]
    fn unique_violation_is_detectable_for_duplicate_mapping() {
        let error = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        assert!(matches!(
            detect_write_violation(&error),
            Some(WriteViolation::Unique { .. })
        ));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(error, UserRegistryError::Query { .. }));
    }
}

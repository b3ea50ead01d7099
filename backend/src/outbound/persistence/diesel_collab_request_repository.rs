//! PostgreSQL-backed `CollabRequestRepository` implementation using Diesel.
//!
//! This adapter is the unit of work for collaboration requests: every
//! mutating method runs one transaction carrying the row change and its
//! audit event. Status and schedule updates are conditional on the status
//! the caller validated against (`UPDATE … WHERE id = ? AND status = ?`);
//! zero affected rows means a concurrent transition won and is reported as
//! `None`, never as a partial write.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::AuditEvent;
use crate::domain::collab::{
    CollabRequest, CollabRequestParts, NewCollabRequest, RequestId, RequestStatus,
};
use crate::domain::ports::{
    CollabRequestFilter, CollabRequestRepository, CollabRequestRepositoryError, Page,
};
use crate::domain::{SkillId, UserId};

use super::audit::append_event;
use super::error_mapping::{
    WriteViolation, detect_write_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CollabRequestRow, NewCollabRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::collab_requests;

/// Diesel-backed implementation of the collaboration request store.
#[derive(Clone)]
pub struct DieselCollabRequestRepository {
    pool: DbPool,
}

impl DieselCollabRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CollabRequestRepositoryError {
    map_basic_pool_error(error, CollabRequestRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CollabRequestRepositoryError {
    map_basic_diesel_error(
        error,
        CollabRequestRepositoryError::query,
        CollabRequestRepositoryError::connection,
    )
}

/// Write-path mapping: integrity violations become their own variants so the
/// service can fold them into the client-error taxonomy.
fn map_write_error(error: diesel::result::Error) -> CollabRequestRepositoryError {
    match detect_write_violation(&error) {
        Some(WriteViolation::ForeignKey { constraint }) => {
            CollabRequestRepositoryError::foreign_key(constraint)
        }
        Some(WriteViolation::Unique { constraint }) => CollabRequestRepositoryError::query(
            format!("unexpected uniqueness violation on {constraint}"),
        ),
        None => map_diesel_error(error),
    }
}

/// Convert a database row into a validated domain request.
fn row_to_request(row: CollabRequestRow) -> Result<CollabRequest, CollabRequestRepositoryError> {
    let CollabRequestRow {
        id,
        requester_id,
        receiver_id,
        offered_skill_id,
        wanted_skill_id,
        status,
        message,
        scheduled_at,
        created_at,
        updated_at,
    } = row;

    let status = status
        .parse::<RequestStatus>()
        .map_err(|err| CollabRequestRepositoryError::query(err.to_string()))?;

    CollabRequest::new(CollabRequestParts {
        id: RequestId::new(id),
        requester_id: UserId::new(requester_id),
        receiver_id: UserId::new(receiver_id),
        offered_skill_id: offered_skill_id.map(SkillId::new),
        wanted_skill_id: wanted_skill_id.map(SkillId::new),
        status,
        message,
        scheduled_at,
        created_at,
        updated_at,
    })
    .map_err(|err| CollabRequestRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CollabRequestRepository for DieselCollabRequestRepository {
    async fn insert(
        &self,
        new_request: &NewCollabRequest,
        audit: &AuditEvent,
    ) -> Result<CollabRequest, CollabRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCollabRequestRow {
            requester_id: new_request.requester_id().get(),
            receiver_id: new_request.receiver_id().get(),
            offered_skill_id: new_request.offered_skill_id().map(SkillId::get),
            wanted_skill_id: new_request.wanted_skill_id().map(SkillId::get),
            message: new_request.message(),
            scheduled_at: new_request.scheduled_at(),
        };
        let event = audit.clone();

        let inserted: CollabRequestRow = conn
            .transaction(|conn| {
                async move {
                    let inserted: CollabRequestRow = diesel::insert_into(collab_requests::table)
                        .values(&new_row)
                        .returning(CollabRequestRow::as_returning())
                        .get_result(conn)
                        .await?;

                    append_event(conn, &event.for_entity_id(inserted.id)).await?;
                    Ok::<_, diesel::result::Error>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;

        row_to_request(inserted)
    }

    async fn find_by_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<CollabRequest>, CollabRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = collab_requests::table
            .filter(collab_requests::id.eq(request_id.get()))
            .select(CollabRequestRow::as_select())
            .first::<CollabRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn list(
        &self,
        filter: &CollabRequestFilter,
        page: Page,
    ) -> Result<Vec<CollabRequest>, CollabRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = collab_requests::table
            .select(CollabRequestRow::as_select())
            .into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(
                collab_requests::requester_id
                    .eq(user_id.get())
                    .or(collab_requests::receiver_id.eq(user_id.get())),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(collab_requests::status.eq(status.as_str()));
        }
        if let Some(since) = filter.since {
            query = query.filter(collab_requests::created_at.ge(since));
        }
        if let Some(until) = filter.until {
            query = query.filter(collab_requests::created_at.lt(until));
        }

        let rows: Vec<CollabRequestRow> = query
            .order(collab_requests::created_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_request).collect()
    }

    async fn update_status(
        &self,
        request_id: RequestId,
        expected: RequestStatus,
        next: RequestStatus,
        audit: &AuditEvent,
    ) -> Result<Option<CollabRequest>, CollabRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let event = audit.clone();

        let row: Option<CollabRequestRow> = conn
            .transaction(|conn| {
                async move {
                    let row = diesel::update(
                        collab_requests::table.filter(
                            collab_requests::id
                                .eq(request_id.get())
                                .and(collab_requests::status.eq(expected.as_str())),
                        ),
                    )
                    .set((
                        collab_requests::status.eq(next.as_str()),
                        collab_requests::updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(CollabRequestRow::as_returning())
                    .get_result::<CollabRequestRow>(conn)
                    .await
                    .optional()?;

                    if row.is_some() {
                        append_event(conn, &event).await?;
                    }
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn update_schedule(
        &self,
        request_id: RequestId,
        expected: RequestStatus,
        scheduled_at: chrono::DateTime<chrono::Utc>,
        audit: &AuditEvent,
    ) -> Result<Option<CollabRequest>, CollabRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let event = audit.clone();

        let row: Option<CollabRequestRow> = conn
            .transaction(|conn| {
                async move {
                    let row = diesel::update(
                        collab_requests::table.filter(
                            collab_requests::id
                                .eq(request_id.get())
                                .and(collab_requests::status.eq(expected.as_str())),
                        ),
                    )
                    .set((
                        collab_requests::scheduled_at.eq(Some(scheduled_at)),
                        collab_requests::updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(CollabRequestRow::as_returning())
                    .get_result::<CollabRequestRow>(conn)
                    .await
                    .optional()?;

                    if row.is_some() {
                        append_event(conn, &event).await?;
                    }
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn delete(
        &self,
        request_id: RequestId,
        audit: &AuditEvent,
    ) -> Result<bool, CollabRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let event = audit.clone();

        conn.transaction(|conn| {
            async move {
                let deleted = diesel::delete(
                    collab_requests::table.filter(collab_requests::id.eq(request_id.get())),
                )
                .execute(conn)
                .await?;

                if deleted > 0 {
                    append_event(conn, &event).await?;
                }
                Ok::<_, diesel::result::Error>(deleted > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

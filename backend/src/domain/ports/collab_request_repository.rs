//! Driven port for collaboration request persistence.
//!
//! Every mutating method receives the audit event describing it and must
//! apply row change and audit append inside one transaction. Status and
//! schedule updates are compare-and-set: they only apply while the row still
//! carries the status the caller validated against, and return `None` when a
//! concurrent transition won the race.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::AuditEvent;
use crate::domain::collab::{CollabRequest, NewCollabRequest, RequestId, RequestStatus};
use crate::domain::UserId;

use super::Page;

/// Errors raised by collaboration request repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollabRequestRepositoryError {
    /// Repository connection could not be established.
    #[error("collab request repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("collab request repository query failed: {message}")]
    Query { message: String },

    /// A referential integrity check failed at write time. Raised when a
    /// referenced user or skill disappeared between pre-check and insert.
    #[error("referential integrity violation on constraint {constraint}")]
    ForeignKey { constraint: String },
}

impl CollabRequestRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a referential integrity error naming the violated constraint.
    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        Self::ForeignKey {
            constraint: constraint.into(),
        }
    }
}

/// Filter applied to collaboration request listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollabRequestFilter {
    /// Match requests where this user is requester or receiver.
    pub user_id: Option<UserId>,
    pub status: Option<RequestStatus>,
    /// Inclusive lower bound on `created_at`.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`.
    pub until: Option<DateTime<Utc>>,
}

/// Port owning the persisted collaboration request rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollabRequestRepository: Send + Sync {
    /// Insert a new request in `PENDING` status and append its audit event,
    /// atomically. Returns the stored row.
    async fn insert(
        &self,
        new_request: &NewCollabRequest,
        audit: &AuditEvent,
    ) -> Result<CollabRequest, CollabRequestRepositoryError>;

    /// Point lookup by id.
    async fn find_by_id(
        &self,
        request_id: RequestId,
    ) -> Result<Option<CollabRequest>, CollabRequestRepositoryError>;

    /// Filtered listing ordered by creation time descending.
    async fn list(
        &self,
        filter: &CollabRequestFilter,
        page: Page,
    ) -> Result<Vec<CollabRequest>, CollabRequestRepositoryError>;

    /// Compare-and-set status update: applies only while the row still holds
    /// `expected`, advancing `updated_at` and appending the audit event in
    /// the same transaction. `None` means a concurrent transition won.
    async fn update_status(
        &self,
        request_id: RequestId,
        expected: RequestStatus,
        next: RequestStatus,
        audit: &AuditEvent,
    ) -> Result<Option<CollabRequest>, CollabRequestRepositoryError>;

    /// Compare-and-set schedule update with the same discipline as
    /// [`CollabRequestRepository::update_status`].
    async fn update_schedule(
        &self,
        request_id: RequestId,
        expected: RequestStatus,
        scheduled_at: DateTime<Utc>,
        audit: &AuditEvent,
    ) -> Result<Option<CollabRequest>, CollabRequestRepositoryError>;

    /// Hard delete, appending the audit event in the same transaction.
    /// Returns `false` when the row was already gone.
    async fn delete(
        &self,
        request_id: RequestId,
        audit: &AuditEvent,
    ) -> Result<bool, CollabRequestRepositoryError>;
}

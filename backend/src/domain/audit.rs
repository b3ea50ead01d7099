//! Audit trail protocol types.
//!
//! Every accepted mutation emits exactly one [`AuditEvent`], appended by the
//! persistence adapter inside the same transaction as the mutation it
//! describes. A mutation whose audit append fails rolls back entirely.

use serde_json::Value;

use crate::domain::UserId;

use super::collab::RequestStatus;

/// Entity name recorded for collaboration request events.
pub const COLLAB_REQUESTS_ENTITY: &str = "collab_requests";
/// Entity name recorded for user events.
pub const USERS_ENTITY: &str = "users";
/// Entity name recorded for skill events.
pub const SKILLS_ENTITY: &str = "skills";

/// Action keyword attached to an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// A new row was created.
    Create,
    /// A status transition; the label is the target status keyword.
    StatusChange { to: RequestStatus },
    /// The scheduled time changed.
    Reschedule,
    /// The row was removed.
    Delete,
}

impl AuditAction {
    /// Keyword stored in the audit log.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::StatusChange { to } => to.as_str(),
            Self::Reschedule => "RESCHEDULE",
            Self::Delete => "DELETE",
        }
    }
}

/// One audit record, as handed to the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Acting user; `None` marks a system-originated write.
    pub actor_user_id: Option<UserId>,
    /// Entity table name, one of the `*_ENTITY` constants.
    pub entity: &'static str,
    /// Row id of the affected entity. `None` at creation time; the adapter
    /// fills it in once the insert returns the assigned id.
    pub entity_id: Option<i32>,
    pub action: AuditAction,
    /// Opaque payload for later reconstruction of history.
    pub metadata: Option<Value>,
}

impl AuditEvent {
    /// Construct an event without an entity id.
    pub fn new(actor_user_id: Option<UserId>, entity: &'static str, action: AuditAction) -> Self {
        Self {
            actor_user_id,
            entity,
            entity_id: None,
            action,
            metadata: None,
        }
    }

    /// Attach the affected row id.
    pub fn for_entity_id(mut self, entity_id: i32) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach a metadata payload.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

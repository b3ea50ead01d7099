//! Collaboration request entity and creation validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{SkillId, UserId};

use super::RequestStatus;

/// Maximum allowed length for the free-text message attached at creation.
pub const MESSAGE_MAX: usize = 500;

/// Validation errors for collaboration request payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollabValidationError {
    SelfDirected,
    MessageTooLong { max: usize },
}

impl fmt::Display for CollabValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfDirected => write!(f, "requester and receiver must be different users"),
            Self::MessageTooLong { max } => {
                write!(f, "message must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CollabValidationError {}

/// Stable collaboration request identifier backed by the serial primary key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RequestId(i32);

impl RequestId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RequestId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Raw field bundle for [`CollabRequest::new`], as loaded from storage.
#[derive(Debug, Clone)]
pub struct CollabRequestParts {
    pub id: RequestId,
    pub requester_id: UserId,
    pub receiver_id: UserId,
    pub offered_skill_id: Option<SkillId>,
    pub wanted_skill_id: Option<SkillId>,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted collaboration request between two distinct users.
///
/// The entity is immutable in memory; every mutation happens through the
/// repository and yields a freshly loaded instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CollabRequest {
    id: RequestId,
    requester_id: UserId,
    receiver_id: UserId,
    offered_skill_id: Option<SkillId>,
    wanted_skill_id: Option<SkillId>,
    status: RequestStatus,
    message: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CollabRequest {
    /// Construct a validated request from persisted parts.
    pub fn new(parts: CollabRequestParts) -> Result<Self, CollabValidationError> {
        let CollabRequestParts {
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
        } = parts;

        validate_parties(requester_id, receiver_id)?;
        validate_message(message.as_deref())?;

        Ok(Self {
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
        })
    }

    /// Returns the request id.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the initiating party.
    pub fn requester_id(&self) -> UserId {
        self.requester_id
    }

    /// Returns the receiving party.
    pub fn receiver_id(&self) -> UserId {
        self.receiver_id
    }

    /// Returns the skill the requester offers to teach, if any.
    pub fn offered_skill_id(&self) -> Option<SkillId> {
        self.offered_skill_id
    }

    /// Returns the skill the requester wants to learn, if any.
    pub fn wanted_skill_id(&self) -> Option<SkillId> {
        self.wanted_skill_id
    }

    /// Returns the current lifecycle status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the message attached at creation.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the agreed session time, if scheduled.
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the given user is the requester or the receiver.
    pub fn is_party(&self, user_id: UserId) -> bool {
        user_id == self.requester_id || user_id == self.receiver_id
    }
}

/// Input payload for [`NewCollabRequest::new`].
#[derive(Debug, Clone)]
pub struct CollabRequestDraft {
    pub requester_id: UserId,
    pub receiver_id: UserId,
    pub offered_skill_id: Option<SkillId>,
    pub wanted_skill_id: Option<SkillId>,
    pub message: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Validated creation payload. The initial status is always `PENDING`; it is
/// not part of the payload so callers cannot choose it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollabRequest {
    requester_id: UserId,
    receiver_id: UserId,
    offered_skill_id: Option<SkillId>,
    wanted_skill_id: Option<SkillId>,
    message: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
}

impl NewCollabRequest {
    /// Validate and construct a creation payload.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::collab::{CollabRequestDraft, NewCollabRequest};
    /// use backend::domain::UserId;
    ///
    /// let request = NewCollabRequest::new(CollabRequestDraft {
    ///     requester_id: UserId::new(1),
    ///     receiver_id: UserId::new(2),
    ///     offered_skill_id: None,
    ///     wanted_skill_id: None,
    ///     message: None,
    ///     scheduled_at: None,
    /// })?;
    /// assert_eq!(request.receiver_id(), UserId::new(2));
    /// # Ok::<(), backend::domain::collab::CollabValidationError>(())
    /// ```
    pub fn new(draft: CollabRequestDraft) -> Result<Self, CollabValidationError> {
        let CollabRequestDraft {
            requester_id,
            receiver_id,
            offered_skill_id,
            wanted_skill_id,
            message,
            scheduled_at,
        } = draft;

        validate_parties(requester_id, receiver_id)?;
        validate_message(message.as_deref())?;

        Ok(Self {
            requester_id,
            receiver_id,
            offered_skill_id,
            wanted_skill_id,
            message,
            scheduled_at,
        })
    }

    /// Returns the initiating party.
    pub fn requester_id(&self) -> UserId {
        self.requester_id
    }

    /// Returns the receiving party.
    pub fn receiver_id(&self) -> UserId {
        self.receiver_id
    }

    /// Returns the offered skill reference, if any.
    pub fn offered_skill_id(&self) -> Option<SkillId> {
        self.offered_skill_id
    }

    /// Returns the wanted skill reference, if any.
    pub fn wanted_skill_id(&self) -> Option<SkillId> {
        self.wanted_skill_id
    }

    /// Returns the message attached to the request.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the proposed session time, if any.
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }
}

fn validate_parties(
    requester_id: UserId,
    receiver_id: UserId,
) -> Result<(), CollabValidationError> {
    if requester_id == receiver_id {
        return Err(CollabValidationError::SelfDirected);
    }
    Ok(())
}

fn validate_message(message: Option<&str>) -> Result<(), CollabValidationError> {
    if let Some(message) = message
        && message.chars().count() > MESSAGE_MAX
    {
        return Err(CollabValidationError::MessageTooLong { max: MESSAGE_MAX });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn draft(requester: i32, receiver: i32) -> CollabRequestDraft {
        CollabRequestDraft {
            requester_id: UserId::new(requester),
            receiver_id: UserId::new(receiver),
            offered_skill_id: Some(SkillId::new(7)),
            wanted_skill_id: None,
            message: Some("happy to trade lessons".to_owned()),
            scheduled_at: None,
        }
    }

    #[rstest]
    fn accepts_distinct_parties() {
        let request = NewCollabRequest::new(draft(1, 2)).expect("valid draft");
        assert_eq!(request.requester_id(), UserId::new(1));
        assert_eq!(request.offered_skill_id(), Some(SkillId::new(7)));
    }

    #[rstest]
    fn rejects_self_directed_request() {
        let error = NewCollabRequest::new(draft(3, 3)).expect_err("self-directed");
        assert_eq!(error, CollabValidationError::SelfDirected);
    }

    #[rstest]
    fn rejects_oversized_message() {
        let mut input = draft(1, 2);
        input.message = Some("m".repeat(MESSAGE_MAX + 1));
        let error = NewCollabRequest::new(input).expect_err("oversized message");
        assert_eq!(error, CollabValidationError::MessageTooLong { max: MESSAGE_MAX });
    }

    #[rstest]
    fn accepts_message_at_the_bound() {
        let mut input = draft(1, 2);
        input.message = Some("m".repeat(MESSAGE_MAX));
        assert!(NewCollabRequest::new(input).is_ok());
    }

    #[rstest]
    fn entity_parties_are_checked_on_load() {
        let parts = CollabRequestParts {
            id: RequestId::new(10),
            requester_id: UserId::new(4),
            receiver_id: UserId::new(4),
            offered_skill_id: None,
            wanted_skill_id: None,
            status: RequestStatus::Pending,
            message: None,
            scheduled_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let error = CollabRequest::new(parts).expect_err("corrupt row");
        assert_eq!(error, CollabValidationError::SelfDirected);
    }

    #[rstest]
    fn is_party_covers_both_sides_only() {
        let parts = CollabRequestParts {
            id: RequestId::new(10),
            requester_id: UserId::new(1),
            receiver_id: UserId::new(2),
            offered_skill_id: None,
            wanted_skill_id: None,
            status: RequestStatus::Pending,
            message: None,
            scheduled_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let request = CollabRequest::new(parts).expect("valid parts");
        assert!(request.is_party(UserId::new(1)));
        assert!(request.is_party(UserId::new(2)));
        assert!(!request.is_party(UserId::new(3)));
    }
}

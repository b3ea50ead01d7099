//! Driving port for collaboration request mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Error;
use crate::domain::collab::{CollabRequest, CollabRequestDraft, RequestId, RequestStatus};
use crate::domain::{SkillId, UserId};

/// Wire-friendly projection of a collaboration request.
#[derive(Debug, Clone, PartialEq)]
pub struct CollabRequestPayload {
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

impl From<CollabRequest> for CollabRequestPayload {
    fn from(request: CollabRequest) -> Self {
        Self {
            id: request.id(),
            requester_id: request.requester_id(),
            receiver_id: request.receiver_id(),
            offered_skill_id: request.offered_skill_id(),
            wanted_skill_id: request.wanted_skill_id(),
            status: request.status(),
            message: request.message().map(ToOwned::to_owned),
            scheduled_at: request.scheduled_at(),
            created_at: request.created_at(),
            updated_at: request.updated_at(),
        }
    }
}

/// Creation input; the requester named in the draft is the acting user.
#[derive(Debug, Clone)]
pub struct CreateCollabRequest {
    pub draft: CollabRequestDraft,
}

/// Status transition input.
#[derive(Debug, Clone, Copy)]
pub struct SetStatusRequest {
    pub request_id: RequestId,
    pub actor_user_id: UserId,
    pub new_status: RequestStatus,
}

/// Schedule change input.
#[derive(Debug, Clone, Copy)]
pub struct RescheduleRequest {
    pub request_id: RequestId,
    pub actor_user_id: UserId,
    pub scheduled_at: DateTime<Utc>,
}

/// Deletion input.
#[derive(Debug, Clone, Copy)]
pub struct DeleteCollabRequest {
    pub request_id: RequestId,
    pub actor_user_id: UserId,
}

/// Domain use-case port for mutating collaboration requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollabRequestCommand: Send + Sync {
    /// Create a request in `PENDING` status.
    async fn create_request(
        &self,
        request: CreateCollabRequest,
    ) -> Result<CollabRequestPayload, Error>;

    /// Apply a status transition on behalf of the acting user.
    async fn set_status(&self, request: SetStatusRequest) -> Result<CollabRequestPayload, Error>;

    /// Change the scheduled time on behalf of the acting user.
    async fn reschedule(&self, request: RescheduleRequest)
    -> Result<CollabRequestPayload, Error>;

    /// Permanently remove a request on behalf of the acting user.
    async fn delete_request(&self, request: DeleteCollabRequest) -> Result<(), Error>;
}

//! Collaboration request domain service.
//!
//! Implements the driving ports by composing the policy checks with the
//! repository's transactional primitives. Validation always runs against a
//! freshly loaded row; the repository's compare-and-set updates turn a stale
//! snapshot into a conflict instead of a lost update.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CollabRequestCommand, CollabRequestPayload, CollabRequestQuery, CollabRequestRepository,
    CollabRequestRepositoryError, CreateCollabRequest, DeleteCollabRequest, ListCollabRequests,
    RescheduleRequest, SetStatusRequest, SkillCatalogue, SkillCatalogueError, UserRegistry,
    UserRegistryError,
};
use crate::domain::{AuditAction, AuditEvent, COLLAB_REQUESTS_ENTITY, Error, SkillId, UserId};

use super::{
    CollabRequest, NewCollabRequest, PolicyViolation, RequestId, authorize_delete,
    authorize_reschedule, authorize_transition,
};

fn map_repository_error(error: CollabRequestRepositoryError) -> Error {
    match error {
        CollabRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("collab request repository unavailable: {message}"))
        }
        CollabRequestRepositoryError::Query { message } => {
            Error::internal(format!("collab request repository error: {message}"))
        }
        // The pre-checks passed but the row vanished before the insert
        // committed; report what the pre-check would have reported.
        CollabRequestRepositoryError::ForeignKey { constraint } => Error::not_found(format!(
            "referenced user or skill no longer exists ({constraint})"
        )),
    }
}

fn map_user_registry_error(error: UserRegistryError) -> Error {
    match error {
        UserRegistryError::Connection { message } => {
            Error::service_unavailable(format!("user registry unavailable: {message}"))
        }
        other => Error::internal(format!("user registry error: {other}")),
    }
}

fn map_skill_catalogue_error(error: SkillCatalogueError) -> Error {
    match error {
        SkillCatalogueError::Connection { message } => {
            Error::service_unavailable(format!("skill catalogue unavailable: {message}"))
        }
        other => Error::internal(format!("skill catalogue error: {other}")),
    }
}

fn map_policy_violation(violation: PolicyViolation) -> Error {
    if violation.is_conflict() {
        Error::conflict(violation.to_string())
    } else {
        Error::forbidden(violation.to_string())
    }
}

fn not_found(request_id: RequestId) -> Error {
    Error::not_found(format!("collab request {request_id} not found"))
}

fn lost_race(request_id: RequestId) -> Error {
    Error::conflict(format!(
        "collab request {request_id} was changed concurrently; fetch the current state first"
    ))
}

/// Domain service implementing the collaboration request use-case ports.
#[derive(Clone)]
pub struct CollabRequestService<R, U, S> {
    requests: Arc<R>,
    users: Arc<U>,
    skills: Arc<S>,
}

impl<R, U, S> CollabRequestService<R, U, S> {
    /// Create a new service over the repository and the existence checkers.
    pub fn new(requests: Arc<R>, users: Arc<U>, skills: Arc<S>) -> Self {
        Self {
            requests,
            users,
            skills,
        }
    }
}

impl<R, U, S> CollabRequestService<R, U, S>
where
    R: CollabRequestRepository,
    U: UserRegistry,
    S: SkillCatalogue,
{
    async fn require_user(&self, user_id: UserId, role: &str) -> Result<(), Error> {
        let exists = self
            .users
            .exists(user_id)
            .await
            .map_err(map_user_registry_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("{role} {user_id} not found")))
        }
    }

    async fn require_skill(&self, skill_id: SkillId, role: &str) -> Result<(), Error> {
        let exists = self
            .skills
            .exists(skill_id)
            .await
            .map_err(map_skill_catalogue_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("{role} {skill_id} not found")))
        }
    }

    async fn load(&self, request_id: RequestId) -> Result<CollabRequest, Error> {
        self.requests
            .find_by_id(request_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(request_id))
    }
}

#[async_trait]
impl<R, U, S> CollabRequestCommand for CollabRequestService<R, U, S>
where
    R: CollabRequestRepository,
    U: UserRegistry,
    S: SkillCatalogue,
{
    async fn create_request(
        &self,
        request: CreateCollabRequest,
    ) -> Result<CollabRequestPayload, Error> {
        let new_request = NewCollabRequest::new(request.draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.require_user(new_request.requester_id(), "requester")
            .await?;
        self.require_user(new_request.receiver_id(), "receiver")
            .await?;
        if let Some(skill_id) = new_request.offered_skill_id() {
            self.require_skill(skill_id, "offered skill").await?;
        }
        if let Some(skill_id) = new_request.wanted_skill_id() {
            self.require_skill(skill_id, "wanted skill").await?;
        }

        let audit = AuditEvent::new(
            Some(new_request.requester_id()),
            COLLAB_REQUESTS_ENTITY,
            AuditAction::Create,
        )
        .with_metadata(json!({
            "receiver_id": new_request.receiver_id(),
            "offered_skill_id": new_request.offered_skill_id(),
            "wanted_skill_id": new_request.wanted_skill_id(),
        }));

        let stored = self
            .requests
            .insert(&new_request, &audit)
            .await
            .map_err(map_repository_error)?;
        Ok(stored.into())
    }

    async fn set_status(&self, request: SetStatusRequest) -> Result<CollabRequestPayload, Error> {
        let current = self.load(request.request_id).await?;
        authorize_transition(&current, request.actor_user_id, request.new_status)
            .map_err(map_policy_violation)?;

        let audit = AuditEvent::new(
            Some(request.actor_user_id),
            COLLAB_REQUESTS_ENTITY,
            AuditAction::StatusChange {
                to: request.new_status,
            },
        )
        .for_entity_id(current.id().get())
        .with_metadata(json!({
            "from": current.status().as_str(),
            "to": request.new_status.as_str(),
        }));

        self.requests
            .update_status(
                request.request_id,
                current.status(),
                request.new_status,
                &audit,
            )
            .await
            .map_err(map_repository_error)?
            .map(Into::into)
            .ok_or_else(|| lost_race(request.request_id))
    }

    async fn reschedule(
        &self,
        request: RescheduleRequest,
    ) -> Result<CollabRequestPayload, Error> {
        let current = self.load(request.request_id).await?;
        authorize_reschedule(&current, request.actor_user_id).map_err(map_policy_violation)?;

        let audit = AuditEvent::new(
            Some(request.actor_user_id),
            COLLAB_REQUESTS_ENTITY,
            AuditAction::Reschedule,
        )
        .for_entity_id(current.id().get())
        .with_metadata(json!({
            "scheduled_at": request.scheduled_at.to_rfc3339(),
        }));

        self.requests
            .update_schedule(
                request.request_id,
                current.status(),
                request.scheduled_at,
                &audit,
            )
            .await
            .map_err(map_repository_error)?
            .map(Into::into)
            .ok_or_else(|| lost_race(request.request_id))
    }

    async fn delete_request(&self, request: DeleteCollabRequest) -> Result<(), Error> {
        let current = self.load(request.request_id).await?;
        authorize_delete(&current, request.actor_user_id).map_err(map_policy_violation)?;

        let audit = AuditEvent::new(
            Some(request.actor_user_id),
            COLLAB_REQUESTS_ENTITY,
            AuditAction::Delete,
        )
        .for_entity_id(current.id().get())
        .with_metadata(json!({ "status": current.status().as_str() }));

        let deleted = self
            .requests
            .delete(request.request_id, &audit)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(not_found(request.request_id))
        }
    }
}

#[async_trait]
impl<R, U, S> CollabRequestQuery for CollabRequestService<R, U, S>
where
    R: CollabRequestRepository,
    U: UserRegistry,
    S: SkillCatalogue,
{
    async fn get_request(&self, request_id: RequestId) -> Result<CollabRequestPayload, Error> {
        self.load(request_id).await.map(Into::into)
    }

    async fn list_requests(
        &self,
        request: ListCollabRequests,
    ) -> Result<Vec<CollabRequestPayload>, Error> {
        let requests = self
            .requests
            .list(&request.filter, request.page)
            .await
            .map_err(map_repository_error)?;
        Ok(requests.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

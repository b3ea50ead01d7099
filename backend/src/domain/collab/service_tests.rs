//! Tests for the collaboration request service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rstest::rstest;

use crate::domain::ports::{
    CollabRequestCommand, CollabRequestFilter, CollabRequestPayload, CollabRequestQuery,
    CollabRequestRepositoryError, CreateCollabRequest, DeleteCollabRequest, ListCollabRequests,
    MockCollabRequestRepository, MockSkillCatalogue, MockUserRegistry, Page, RescheduleRequest,
    SetStatusRequest, UserRegistryError,
};
use crate::domain::collab::{CollabRequestDraft, CollabRequestParts, RequestStatus};
use crate::domain::{ErrorCode, SkillId, UserId};

use super::*;

const REQUESTER: UserId = UserId::new(1);
const RECEIVER: UserId = UserId::new(2);
const OUTSIDER: UserId = UserId::new(9);
const REQUEST_ID: RequestId = RequestId::new(42);

type Service =
    CollabRequestService<MockCollabRequestRepository, MockUserRegistry, MockSkillCatalogue>;

fn service(
    requests: MockCollabRequestRepository,
    users: MockUserRegistry,
    skills: MockSkillCatalogue,
) -> Service {
    CollabRequestService::new(Arc::new(requests), Arc::new(users), Arc::new(skills))
}

fn users_all_exist() -> MockUserRegistry {
    let mut users = MockUserRegistry::new();
    users.expect_exists().returning(|_| Ok(true));
    users
}

fn skills_all_exist() -> MockSkillCatalogue {
    let mut skills = MockSkillCatalogue::new();
    skills.expect_exists().returning(|_| Ok(true));
    skills
}

fn stored_request(status: RequestStatus) -> CollabRequest {
    let created_at = Utc::now() - Duration::minutes(30);
    CollabRequest::new(CollabRequestParts {
        id: REQUEST_ID,
        requester_id: REQUESTER,
        receiver_id: RECEIVER,
        offered_skill_id: Some(SkillId::new(7)),
        wanted_skill_id: None,
        status,
        message: Some("swap lessons?".to_owned()),
        scheduled_at: None,
        created_at,
        updated_at: created_at,
    })
    .expect("valid request")
}

fn transitioned(from: &CollabRequest, status: RequestStatus) -> CollabRequest {
    CollabRequest::new(CollabRequestParts {
        id: from.id(),
        requester_id: from.requester_id(),
        receiver_id: from.receiver_id(),
        offered_skill_id: from.offered_skill_id(),
        wanted_skill_id: from.wanted_skill_id(),
        status,
        message: from.message().map(ToOwned::to_owned),
        scheduled_at: from.scheduled_at(),
        created_at: from.created_at(),
        updated_at: Utc::now(),
    })
    .expect("valid request")
}

fn draft() -> CollabRequestDraft {
    CollabRequestDraft {
        requester_id: REQUESTER,
        receiver_id: RECEIVER,
        offered_skill_id: Some(SkillId::new(7)),
        wanted_skill_id: None,
        message: Some("swap lessons?".to_owned()),
        scheduled_at: None,
    }
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_inserts_pending_request_with_create_audit() {
    let stored = stored_request(RequestStatus::Pending);
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_insert()
        .times(1)
        .withf(|new_request, audit| {
            new_request.requester_id() == REQUESTER
                && audit.actor_user_id == Some(REQUESTER)
                && audit.action.label() == "CREATE"
                && audit.entity == "collab_requests"
        })
        .return_once(move |_, _| Ok(stored));

    let response = service(requests, users_all_exist(), skills_all_exist())
        .create_request(CreateCollabRequest { draft: draft() })
        .await
        .expect("create succeeds");

    assert_eq!(response.status, RequestStatus::Pending);
    assert_eq!(response.requester_id, REQUESTER);
}

#[tokio::test]
async fn create_rejects_self_directed_before_any_storage_access() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_insert().times(0);
    let mut users = MockUserRegistry::new();
    users.expect_exists().times(0);

    let mut input = draft();
    input.receiver_id = REQUESTER;
    let error = service(requests, users, skills_all_exist())
        .create_request(CreateCollabRequest { draft: input })
        .await
        .expect_err("self-directed");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_reports_missing_receiver_as_not_found() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_insert().times(0);
    let mut users = MockUserRegistry::new();
    users
        .expect_exists()
        .returning(|user_id| Ok(user_id == REQUESTER));

    let error = service(requests, users, skills_all_exist())
        .create_request(CreateCollabRequest { draft: draft() })
        .await
        .expect_err("missing receiver");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("receiver"));
}

#[tokio::test]
async fn create_reports_missing_offered_skill_as_not_found() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_insert().times(0);
    let mut skills = MockSkillCatalogue::new();
    skills.expect_exists().returning(|_| Ok(false));

    let error = service(requests, users_all_exist(), skills)
        .create_request(CreateCollabRequest { draft: draft() })
        .await
        .expect_err("missing skill");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(error.message().contains("offered skill"));
}

#[tokio::test]
async fn create_maps_foreign_key_race_to_not_found() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_insert().times(1).return_once(|_, _| {
        Err(CollabRequestRepositoryError::foreign_key(
            "collab_requests_receiver_id_fkey",
        ))
    });

    let error = service(requests, users_all_exist(), skills_all_exist())
        .create_request(CreateCollabRequest { draft: draft() })
        .await
        .expect_err("fk race");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

// ---------------------------------------------------------------------------
// set_status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn receiver_accepts_pending_request_and_updated_at_advances() {
    let current = stored_request(RequestStatus::Pending);
    let previous_updated_at = current.updated_at();
    let updated = transitioned(&current, RequestStatus::Accepted);

    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(current)));
    requests
        .expect_update_status()
        .times(1)
        .withf(|request_id, expected, next, audit| {
            *request_id == REQUEST_ID
                && *expected == RequestStatus::Pending
                && *next == RequestStatus::Accepted
                && audit.action.label() == "ACCEPTED"
                && audit.entity_id == Some(REQUEST_ID.get())
        })
        .return_once(move |_, _, _, _| Ok(Some(updated)));

    let response = service(requests, users_all_exist(), skills_all_exist())
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: RECEIVER,
            new_status: RequestStatus::Accepted,
        })
        .await
        .expect("accept succeeds");

    assert_eq!(response.status, RequestStatus::Accepted);
    assert!(response.updated_at > previous_updated_at);
}

#[tokio::test]
async fn accepting_an_accepted_request_is_a_conflict() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Accepted))));
    requests.expect_update_status().times(0);

    let error = service(requests, users_all_exist(), skills_all_exist())
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: RECEIVER,
            new_status: RequestStatus::Accepted,
        })
        .await
        .expect_err("double accept");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn requester_cannot_accept_their_own_request() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Pending))));
    requests.expect_update_status().times(0);

    let error = service(requests, users_all_exist(), skills_all_exist())
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: REQUESTER,
            new_status: RequestStatus::Accepted,
        })
        .await
        .expect_err("requester accept");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn completing_straight_from_pending_is_a_conflict() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Pending))));
    requests.expect_update_status().times(0);

    let error = service(requests, users_all_exist(), skills_all_exist())
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: RECEIVER,
            new_status: RequestStatus::Completed,
        })
        .await
        .expect_err("complete from pending");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn either_party_completes_an_accepted_request() {
    for actor in [REQUESTER, RECEIVER] {
        let current = stored_request(RequestStatus::Accepted);
        let updated = transitioned(&current, RequestStatus::Completed);
        let mut requests = MockCollabRequestRepository::new();
        requests
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(current)));
        requests
            .expect_update_status()
            .return_once(move |_, _, _, _| Ok(Some(updated)));

        let response = service(requests, users_all_exist(), skills_all_exist())
            .set_status(SetStatusRequest {
                request_id: REQUEST_ID,
                actor_user_id: actor,
                new_status: RequestStatus::Completed,
            })
            .await
            .expect("complete succeeds");
        assert_eq!(response.status, RequestStatus::Completed);
    }
}

#[tokio::test]
async fn losing_the_compare_and_set_race_is_a_conflict() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Pending))));
    // A concurrent writer moved the row after our snapshot was taken.
    requests
        .expect_update_status()
        .times(1)
        .return_once(|_, _, _, _| Ok(None));

    let error = service(requests, users_all_exist(), skills_all_exist())
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: RECEIVER,
            new_status: RequestStatus::Accepted,
        })
        .await
        .expect_err("lost race");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn set_status_on_missing_request_is_not_found() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(requests, users_all_exist(), skills_all_exist())
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: RECEIVER,
            new_status: RequestStatus::Accepted,
        })
        .await
        .expect_err("missing request");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn third_parties_are_forbidden_from_every_mutation() {
    let svc = |status| {
        let mut requests = MockCollabRequestRepository::new();
        requests
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored_request(status))));
        requests.expect_update_status().times(0);
        requests.expect_update_schedule().times(0);
        requests.expect_delete().times(0);
        service(requests, users_all_exist(), skills_all_exist())
    };

    let error = svc(RequestStatus::Pending)
        .set_status(SetStatusRequest {
            request_id: REQUEST_ID,
            actor_user_id: OUTSIDER,
            new_status: RequestStatus::Cancelled,
        })
        .await
        .expect_err("outsider status change");
    assert_eq!(error.code(), ErrorCode::Forbidden);

    let error = svc(RequestStatus::Pending)
        .reschedule(RescheduleRequest {
            request_id: REQUEST_ID,
            actor_user_id: OUTSIDER,
            scheduled_at: Utc::now(),
        })
        .await
        .expect_err("outsider reschedule");
    assert_eq!(error.code(), ErrorCode::Forbidden);

    let error = svc(RequestStatus::Completed)
        .delete_request(DeleteCollabRequest {
            request_id: REQUEST_ID,
            actor_user_id: OUTSIDER,
        })
        .await
        .expect_err("outsider delete");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

// ---------------------------------------------------------------------------
// reschedule
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reschedule_updates_schedule_while_pending() {
    let current = stored_request(RequestStatus::Pending);
    let scheduled_at = Utc::now() + Duration::days(2);
    let mut updated = transitioned(&current, RequestStatus::Pending);
    updated = CollabRequest::new(CollabRequestParts {
        id: updated.id(),
        requester_id: updated.requester_id(),
        receiver_id: updated.receiver_id(),
        offered_skill_id: updated.offered_skill_id(),
        wanted_skill_id: updated.wanted_skill_id(),
        status: updated.status(),
        message: updated.message().map(ToOwned::to_owned),
        scheduled_at: Some(scheduled_at),
        created_at: updated.created_at(),
        updated_at: updated.updated_at(),
    })
    .expect("valid request");

    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    requests
        .expect_update_schedule()
        .times(1)
        .withf(move |request_id, expected, when, audit| {
            *request_id == REQUEST_ID
                && *expected == RequestStatus::Pending
                && *when == scheduled_at
                && audit.action.label() == "RESCHEDULE"
        })
        .return_once(move |_, _, _, _| Ok(Some(updated)));

    let response = service(requests, users_all_exist(), skills_all_exist())
        .reschedule(RescheduleRequest {
            request_id: REQUEST_ID,
            actor_user_id: REQUESTER,
            scheduled_at,
        })
        .await
        .expect("reschedule succeeds");

    assert_eq!(response.scheduled_at, Some(scheduled_at));
}

#[tokio::test]
async fn reschedule_after_decline_is_a_conflict() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Declined))));
    requests.expect_update_schedule().times(0);

    let error = service(requests, users_all_exist(), skills_all_exist())
        .reschedule(RescheduleRequest {
            request_id: REQUEST_ID,
            actor_user_id: REQUESTER,
            scheduled_at: Utc::now(),
        })
        .await
        .expect_err("terminal reschedule");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_request_in_any_status() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Completed))));
    requests
        .expect_delete()
        .times(1)
        .withf(|request_id, audit| {
            *request_id == REQUEST_ID && audit.action.label() == "DELETE"
        })
        .return_once(|_, _| Ok(true));

    service(requests, users_all_exist(), skills_all_exist())
        .delete_request(DeleteCollabRequest {
            request_id: REQUEST_ID,
            actor_user_id: RECEIVER,
        })
        .await
        .expect("delete succeeds");
}

#[tokio::test]
async fn delete_of_concurrently_removed_row_is_not_found() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Pending))));
    requests.expect_delete().return_once(|_, _| Ok(false));

    let error = service(requests, users_all_exist(), skills_all_exist())
        .delete_request(DeleteCollabRequest {
            request_id: REQUEST_ID,
            actor_user_id: REQUESTER,
        })
        .await
        .expect_err("row already gone");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

// ---------------------------------------------------------------------------
// queries and error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_request_returns_payload() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_request(RequestStatus::Pending))));

    let payload: CollabRequestPayload = service(requests, users_all_exist(), skills_all_exist())
        .get_request(REQUEST_ID)
        .await
        .expect("request found");
    assert_eq!(payload.id, REQUEST_ID);
}

#[tokio::test]
async fn get_request_maps_missing_row_to_not_found() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(requests, users_all_exist(), skills_all_exist())
        .get_request(REQUEST_ID)
        .await
        .expect_err("missing request");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_requests_forwards_filter_and_page() {
    let filter = CollabRequestFilter {
        user_id: Some(REQUESTER),
        status: Some(RequestStatus::Pending),
        since: None,
        until: None,
    };
    let expected_filter = filter.clone();
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_list()
        .times(1)
        .withf(move |actual, page| *actual == expected_filter && page.limit() == 20)
        .return_once(|_, _| Ok(vec![stored_request(RequestStatus::Pending)]));

    let listed = service(requests, users_all_exist(), skills_all_exist())
        .list_requests(ListCollabRequests {
            filter,
            page: Page::default(),
        })
        .await
        .expect("list succeeds");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut requests = MockCollabRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(|_| Err(CollabRequestRepositoryError::connection("pool exhausted")));

    let error = service(requests, users_all_exist(), skills_all_exist())
        .get_request(REQUEST_ID)
        .await
        .expect_err("repository down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn existence_check_outage_surfaces_as_service_unavailable() {
    let mut requests = MockCollabRequestRepository::new();
    requests.expect_insert().times(0);
    let mut users = MockUserRegistry::new();
    users
        .expect_exists()
        .return_once(|_| Err(UserRegistryError::connection("pool exhausted")));

    let error = service(requests, users, skills_all_exist())
        .create_request(CreateCollabRequest { draft: draft() })
        .await
        .expect_err("registry down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

//! Collaboration request HTTP handlers.
//!
//! ```text
//! GET    /api/v1/collab-requests
//! GET    /api/v1/collab-requests/{request_id}
//! POST   /api/v1/collab-requests
//! POST   /api/v1/collab-requests/{request_id}/status
//! POST   /api/v1/collab-requests/{request_id}/reschedule
//! DELETE /api/v1/collab-requests/{request_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::collab::{CollabRequestDraft, RequestId};
use crate::domain::ports::{
    CollabRequestFilter, CollabRequestPayload, CreateCollabRequest, DeleteCollabRequest,
    ListCollabRequests, RescheduleRequest, SetStatusRequest,
};
use crate::domain::{SkillId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_rfc3339_timestamp, parse_optional_status, parse_page,
    parse_rfc3339_timestamp, parse_status,
};

/// Request payload for creating a collaboration request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCollabRequestBody {
    pub requester_id: i32,
    pub receiver_id: i32,
    pub offered_skill_id: Option<i32>,
    pub wanted_skill_id: Option<i32>,
    pub message: Option<String>,
    #[schema(format = "date-time")]
    pub scheduled_at: Option<String>,
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CollabStatusUpdateBody {
    /// Acting user; must be the requester or the receiver.
    pub actor_user_id: i32,
    #[schema(example = "ACCEPTED")]
    pub new_status: String,
}

/// Request payload for a schedule change.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CollabRescheduleBody {
    pub actor_user_id: i32,
    #[schema(format = "date-time")]
    pub scheduled_at: String,
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCollabRequestsQuery {
    /// Return requests where this user is requester or receiver.
    pub user_id: Option<i32>,
    pub status: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters accepted by the delete endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteCollabRequestQuery {
    /// User performing the delete.
    pub actor_user_id: i32,
}

/// Response payload for a collaboration request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollabRequestBody {
    pub id: i32,
    pub requester_id: i32,
    pub receiver_id: i32,
    pub offered_skill_id: Option<i32>,
    pub wanted_skill_id: Option<i32>,
    #[schema(example = "PENDING")]
    pub status: String,
    pub message: Option<String>,
    #[schema(format = "date-time")]
    pub scheduled_at: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<CollabRequestPayload> for CollabRequestBody {
    fn from(payload: CollabRequestPayload) -> Self {
        Self {
            id: payload.id.get(),
            requester_id: payload.requester_id.get(),
            receiver_id: payload.receiver_id.get(),
            offered_skill_id: payload.offered_skill_id.map(SkillId::get),
            wanted_skill_id: payload.wanted_skill_id.map(SkillId::get),
            status: payload.status.as_str().to_owned(),
            message: payload.message,
            scheduled_at: payload.scheduled_at.map(|at| at.to_rfc3339()),
            created_at: payload.created_at.to_rfc3339(),
            updated_at: payload.updated_at.to_rfc3339(),
        }
    }
}

/// List collaboration requests, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/collab-requests",
    params(ListCollabRequestsQuery),
    responses(
        (status = 200, description = "Matching requests", body = [CollabRequestBody]),
        (status = 400, description = "Invalid filter or pagination", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["collab-requests"],
    operation_id = "listCollabRequests"
)]
#[get("/collab-requests")]
pub async fn list_collab_requests(
    state: web::Data<HttpState>,
    query: web::Query<ListCollabRequestsQuery>,
) -> ApiResult<web::Json<Vec<CollabRequestBody>>> {
    let query = query.into_inner();
    let page = parse_page(query.limit, query.offset)?;
    let filter = CollabRequestFilter {
        user_id: query.user_id.map(UserId::new),
        status: parse_optional_status(query.status, FieldName::new("status"))?,
        since: parse_optional_rfc3339_timestamp(query.since, FieldName::new("since"))?,
        until: parse_optional_rfc3339_timestamp(query.until, FieldName::new("until"))?,
    };

    let requests = state
        .collab_queries
        .list_requests(ListCollabRequests { filter, page })
        .await?;

    Ok(web::Json(
        requests.into_iter().map(CollabRequestBody::from).collect(),
    ))
}

/// Fetch one collaboration request.
#[utoipa::path(
    get,
    path = "/api/v1/collab-requests/{request_id}",
    params(("request_id" = i32, Path, description = "Collaboration request id")),
    responses(
        (status = 200, description = "The request", body = CollabRequestBody),
        (status = 404, description = "Request not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["collab-requests"],
    operation_id = "getCollabRequest"
)]
#[get("/collab-requests/{request_id}")]
pub async fn get_collab_request(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<CollabRequestBody>> {
    let request = state
        .collab_queries
        .get_request(RequestId::new(path.into_inner()))
        .await?;
    Ok(web::Json(request.into()))
}

/// Create a collaboration request in `PENDING` status.
#[utoipa::path(
    post,
    path = "/api/v1/collab-requests",
    request_body = CreateCollabRequestBody,
    responses(
        (status = 201, description = "Request created", body = CollabRequestBody),
        (status = 400, description = "Invalid payload", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Referenced user or skill not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["collab-requests"],
    operation_id = "createCollabRequest"
)]
#[post("/collab-requests")]
pub async fn create_collab_request(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCollabRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let draft = CollabRequestDraft {
        requester_id: UserId::new(payload.requester_id),
        receiver_id: UserId::new(payload.receiver_id),
        offered_skill_id: payload.offered_skill_id.map(SkillId::new),
        wanted_skill_id: payload.wanted_skill_id.map(SkillId::new),
        message: payload.message,
        scheduled_at: parse_optional_rfc3339_timestamp(
            payload.scheduled_at,
            FieldName::new("scheduled_at"),
        )?,
    };

    let created = state
        .collab_commands
        .create_request(CreateCollabRequest { draft })
        .await?;

    Ok(HttpResponse::Created().json(CollabRequestBody::from(created)))
}

/// Apply a status transition.
#[utoipa::path(
    post,
    path = "/api/v1/collab-requests/{request_id}/status",
    params(("request_id" = i32, Path, description = "Collaboration request id")),
    request_body = CollabStatusUpdateBody,
    responses(
        (status = 200, description = "Status changed", body = CollabRequestBody),
        (status = 403, description = "Actor may not perform this transition", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Request not found", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Transition not legal from the current status", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["collab-requests"],
    operation_id = "setCollabRequestStatus"
)]
#[post("/collab-requests/{request_id}/status")]
pub async fn set_collab_request_status(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<CollabStatusUpdateBody>,
) -> ApiResult<web::Json<CollabRequestBody>> {
    let payload = payload.into_inner();
    let new_status = parse_status(payload.new_status, FieldName::new("new_status"))?;

    let updated = state
        .collab_commands
        .set_status(SetStatusRequest {
            request_id: RequestId::new(path.into_inner()),
            actor_user_id: UserId::new(payload.actor_user_id),
            new_status,
        })
        .await?;

    Ok(web::Json(updated.into()))
}

/// Change the scheduled session time.
#[utoipa::path(
    post,
    path = "/api/v1/collab-requests/{request_id}/reschedule",
    params(("request_id" = i32, Path, description = "Collaboration request id")),
    request_body = CollabRescheduleBody,
    responses(
        (status = 200, description = "Schedule changed", body = CollabRequestBody),
        (status = 403, description = "Actor is not a participant", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Request not found", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Request is in a terminal status", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["collab-requests"],
    operation_id = "rescheduleCollabRequest"
)]
#[post("/collab-requests/{request_id}/reschedule")]
pub async fn reschedule_collab_request(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<CollabRescheduleBody>,
) -> ApiResult<web::Json<CollabRequestBody>> {
    let payload = payload.into_inner();
    let scheduled_at =
        parse_rfc3339_timestamp(payload.scheduled_at, FieldName::new("scheduled_at"))?;

    let updated = state
        .collab_commands
        .reschedule(RescheduleRequest {
            request_id: RequestId::new(path.into_inner()),
            actor_user_id: UserId::new(payload.actor_user_id),
            scheduled_at,
        })
        .await?;

    Ok(web::Json(updated.into()))
}

/// Permanently remove a collaboration request.
#[utoipa::path(
    delete,
    path = "/api/v1/collab-requests/{request_id}",
    params(
        ("request_id" = i32, Path, description = "Collaboration request id"),
        DeleteCollabRequestQuery
    ),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Actor is not a participant", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Request not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["collab-requests"],
    operation_id = "deleteCollabRequest"
)]
#[delete("/collab-requests/{request_id}")]
pub async fn delete_collab_request(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    query: web::Query<DeleteCollabRequestQuery>,
) -> ApiResult<HttpResponse> {
    state
        .collab_commands
        .delete_request(DeleteCollabRequest {
            request_id: RequestId::new(path.into_inner()),
            actor_user_id: UserId::new(query.actor_user_id),
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "collab_requests_tests.rs"]
mod tests;

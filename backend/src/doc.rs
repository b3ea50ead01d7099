//! OpenAPI documentation aggregation for Swagger UI and tooling.

use utoipa::OpenApi;

/// Public OpenAPI surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skill Exchange API",
        description = "Marketplace backend: users advertise skills and negotiate collaboration sessions."
    ),
    paths(
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::skills::create_skill,
        crate::inbound::http::skills::get_skill,
        crate::inbound::http::skills::list_skills,
        crate::inbound::http::collab_requests::list_collab_requests,
        crate::inbound::http::collab_requests::get_collab_request,
        crate::inbound::http::collab_requests::create_collab_request,
        crate::inbound::http::collab_requests::set_collab_request_status,
        crate::inbound::http::collab_requests::reschedule_collab_request,
        crate::inbound::http::collab_requests::delete_collab_request,
    ),
    components(schemas(
        crate::inbound::http::schemas::ErrorSchema,
        crate::inbound::http::users::CreateUserBody,
        crate::inbound::http::users::UserBody,
        crate::inbound::http::skills::CreateSkillBody,
        crate::inbound::http::skills::SkillBody,
        crate::inbound::http::collab_requests::CreateCollabRequestBody,
        crate::inbound::http::collab_requests::CollabStatusUpdateBody,
        crate::inbound::http::collab_requests::CollabRescheduleBody,
        crate::inbound::http::collab_requests::CollabRequestBody,
    )),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "users", description = "User registry"),
        (name = "skills", description = "Skill catalogue"),
        (name = "collab-requests", description = "Collaboration request lifecycle"),
    )
)]
pub struct ApiDoc;

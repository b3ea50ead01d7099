//! Skill catalogue HTTP handlers.
//!
//! ```text
//! GET  /api/v1/skills
//! GET  /api/v1/skills/{skill_id}
//! POST /api/v1/skills
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{SkillCatalogueError, SkillSearch};
use crate::domain::{Error, NewSkill, Skill, SkillId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_page;

/// Request payload for listing a skill.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSkillBody {
    #[schema(example = "Sourdough Baking")]
    pub name: String,
    pub category: Option<String>,
    /// Custom slug; derived from the name when omitted.
    pub slug: Option<String>,
}

/// Query parameters accepted by the search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSkillsQuery {
    /// Substring search over name, slug, and category.
    pub q: Option<String>,
    /// Restrict to active skills; defaults to true.
    pub only_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response payload for a skill.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkillBody {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub category: Option<String>,
    pub is_active: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Skill> for SkillBody {
    fn from(skill: Skill) -> Self {
        Self {
            id: skill.id().get(),
            name: skill.name().to_owned(),
            slug: skill.slug().to_owned(),
            category: skill.category().map(ToOwned::to_owned),
            is_active: skill.is_active(),
            created_at: skill.created_at().to_rfc3339(),
        }
    }
}

fn map_catalogue_error(error: SkillCatalogueError) -> Error {
    match error {
        SkillCatalogueError::Connection { message } => {
            Error::service_unavailable(format!("skill catalogue unavailable: {message}"))
        }
        SkillCatalogueError::Query { message } => {
            Error::internal(format!("skill catalogue error: {message}"))
        }
        SkillCatalogueError::DuplicateSlug { slug } => {
            Error::conflict(format!("slug {slug} is already in use"))
        }
    }
}

/// List a new skill in the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/skills",
    request_body = CreateSkillBody,
    responses(
        (status = 201, description = "Skill listed", body = SkillBody),
        (status = 400, description = "Invalid payload", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Slug already in use", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["skills"],
    operation_id = "createSkill"
)]
#[post("/skills")]
pub async fn create_skill(
    state: web::Data<HttpState>,
    payload: web::Json<CreateSkillBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let new_skill = NewSkill::new(payload.name, payload.category, payload.slug)
        .map_err(|err| Error::invalid_request(err.to_string()))?;

    let skill = state
        .skills
        .create(&new_skill)
        .await
        .map_err(map_catalogue_error)?;

    Ok(HttpResponse::Created().json(SkillBody::from(skill)))
}

/// Fetch one skill.
#[utoipa::path(
    get,
    path = "/api/v1/skills/{skill_id}",
    params(("skill_id" = i32, Path, description = "Skill id")),
    responses(
        (status = 200, description = "The skill", body = SkillBody),
        (status = 404, description = "Skill not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["skills"],
    operation_id = "getSkill"
)]
#[get("/skills/{skill_id}")]
pub async fn get_skill(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<SkillBody>> {
    let skill_id = SkillId::new(path.into_inner());
    let skill = state
        .skills
        .find_by_id(skill_id)
        .await
        .map_err(map_catalogue_error)?
        .ok_or_else(|| Error::not_found(format!("skill {skill_id} not found")))?;

    Ok(web::Json(skill.into()))
}

/// Search skills ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/skills",
    params(ListSkillsQuery),
    responses(
        (status = 200, description = "Matching skills", body = [SkillBody]),
        (status = 400, description = "Invalid pagination", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["skills"],
    operation_id = "listSkills"
)]
#[get("/skills")]
pub async fn list_skills(
    state: web::Data<HttpState>,
    query: web::Query<ListSkillsQuery>,
) -> ApiResult<web::Json<Vec<SkillBody>>> {
    let query = query.into_inner();
    let page = parse_page(query.limit, query.offset)?;
    let search = SkillSearch {
        query: query.q,
        only_active: query.only_active.unwrap_or(true),
    };

    let skills = state
        .skills
        .search(&search, page)
        .await
        .map_err(map_catalogue_error)?;

    Ok(web::Json(skills.into_iter().map(SkillBody::from).collect()))
}

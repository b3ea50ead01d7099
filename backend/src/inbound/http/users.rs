//! User HTTP handlers.
//!
//! ```text
//! GET  /api/v1/users
//! GET  /api/v1/users/{user_id}
//! POST /api/v1/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::UserRegistryError;
use crate::domain::{Error, NewUser, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_page;

/// Request payload for registering a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserBody {
    #[schema(example = "ada@example.org")]
    pub email: String,
    pub full_name: Option<String>,
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response payload for a user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBody {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id().get(),
            email: user.email().to_owned(),
            full_name: user.full_name().map(ToOwned::to_owned),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

fn map_registry_error(error: UserRegistryError) -> Error {
    match error {
        UserRegistryError::Connection { message } => {
            Error::service_unavailable(format!("user registry unavailable: {message}"))
        }
        UserRegistryError::Query { message } => {
            Error::internal(format!("user registry error: {message}"))
        }
        UserRegistryError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User registered", body = UserBody),
        (status = 400, description = "Invalid payload", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Email already registered", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let new_user = NewUser::new(payload.email, payload.full_name)
        .map_err(|err| Error::invalid_request(err.to_string()))?;

    let user = state
        .users
        .create(&new_user)
        .await
        .map_err(map_registry_error)?;

    Ok(HttpResponse::Created().json(UserBody::from(user)))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserBody),
        (status = 404, description = "User not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserBody>> {
    let user_id = UserId::new(path.into_inner());
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(map_registry_error)?
        .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;

    Ok(web::Json(user.into()))
}

/// List users ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Registered users", body = [UserBody]),
        (status = 400, description = "Invalid pagination", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Vec<UserBody>>> {
    let page = parse_page(query.limit, query.offset)?;
    let users = state.users.list(page).await.map_err(map_registry_error)?;
    Ok(web::Json(users.into_iter().map(UserBody::from).collect()))
}

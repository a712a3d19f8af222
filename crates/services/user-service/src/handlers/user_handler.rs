//! User handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{ApiResponse, AppError, AppResult, Created};
use domain::{CreateUser, UserResponse};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Pagination parameters, kept as text so parse failures get our own message
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Rows to skip
    #[param(example = "0")]
    pub offset: Option<String>,
    /// Page size, must be positive
    #[param(example = "10")]
    pub limit: Option<String>,
}

/// User creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Ignored; the store assigns identifiers
    pub id: Option<i32>,
    #[validate(length(min = 1, message = "email is required"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Optional; stored as submitted, empty when absent
    #[serde(default)]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = 36)]
    pub age: i32,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            name: request.name,
            age: request.age,
        }
    }
}

/// Identifier of a newly created user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedUser {
    pub id: i32,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:email", get(get_user))
}

fn parse_param(name: &str, value: Option<&str>) -> AppResult<i64> {
    let raw = value.ok_or_else(|| AppError::bad_request(format!("{} is required", name)))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("{} must be an integer, got {:?}", name, raw)))
}

/// List users page by page
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>),
        (status = 400, description = "Missing, unparseable or non-positive pagination"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let limit = parse_param("limit", params.limit.as_deref())?;
    let offset = parse_param("offset", params.offset.as_deref())?;

    let users = state.users.list_users(offset, limit).await?;

    Ok(Json(ApiResponse::success(
        format!("{} users found", users.len()),
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/users/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "User email address")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Blank email"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    if email.trim().is_empty() {
        return Err(AppError::validation("email is required"));
    }

    let user = state.users.get_user(&email).await?;

    Ok(Json(ApiResponse::success(
        format!("user with email {} found", email),
        UserResponse::from(user),
    )))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedUser),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<CreatedUser>> {
    let id = state.users.create_user(payload.into()).await?;

    Ok(Created(
        format!("created user with id {}", id),
        CreatedUser { id },
    ))
}

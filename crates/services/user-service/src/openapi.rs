//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::user_handler::{CreateUserRequest, CreatedUser};
use domain::UserResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::create_user,
    ),
    components(
        schemas(
            UserResponse,
            CreateUserRequest,
            CreatedUser,
        )
    ),
    tags(
        (name = "Users", description = "User directory endpoints"),
    )
)]
pub struct ApiDoc;

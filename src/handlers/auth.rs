use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthRouterExt, AuthUser};
use crate::entities::user::UserRole;
use crate::errors::{ApiError, ServiceError};
use crate::handlers::common::{created_response, success_response, validate_input};
use crate::handlers::users::{CreateUserRequest, UserResponse};
use crate::services::users::CreateUserInput;
use crate::{ApiResponse, AppState};

/// Session endpoints. `/login` is reachable without a token; `/register`
/// and `/me` require one.
pub fn auth_routes() -> Router<AppState> {
    let public = Router::new().route("/login", post(login));
    let protected = Router::new()
        .route("/register", post(register))
        .route("/me", get(me))
        .with_auth();

    public.merge(protected)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus the user fields the client needs to render a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.auth_service.generate_token(&user)?;
    info!(user_id = %user.id, "login succeeded");

    Ok(success_response(ApiResponse::success(LoginResponse {
        token,
        user: SessionUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth_user.is_admin() {
        warn!(user_id = %auth_user.user_id, "non-admin attempted to register a user");
        return Err(ServiceError::Forbidden(
            "Only administrators can create users".to_string(),
        )
        .into());
    }
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .create_user(CreateUserInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            created_by: auth_user.id(),
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok(created_response(
        ApiResponse::success(UserResponse::from(user)).with_message("User created successfully"),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = auth_user.id().ok_or_else(|| {
        ServiceError::Unauthorized("Authentication required".to_string())
    })?;
    let user = state.services.users.get_user(user_id).await?;

    Ok(success_response(ApiResponse::success(UserResponse::from(
        user,
    ))))
}

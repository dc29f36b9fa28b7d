use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::user::{self, UserRole};
use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, default_page, default_per_page, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::services::users::{CreateUserInput, UpdateUserInput, UserFilter};
use crate::{ApiResponse, AppState};

/// User account management endpoints. The whole router is restricted to
/// administrators when it is mounted.
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/:id/activate", patch(activate_user))
        .route("/:id/deactivate", patch(deactivate_user))
}

/// User fields that are safe to expose over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_by: user.created_by,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Restrict to a single role
    pub role: Option<UserRole>,
    /// Restrict to active (`true`) or deactivated (`false`) accounts
    pub active: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Paginated list of users", body = ApiResponse<PaginatedResponse<UserResponse>>),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = UserFilter {
        role: query.role,
        active: query.active,
    };
    let (users, total) = state
        .services
        .users
        .list_users(filter, pagination.page, pagination.limit())
        .await?;
    let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(success_response(ApiResponse::success(
        PaginatedResponse::new(items, pagination.page, pagination.limit(), total),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 404, description = "No such user", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.services.users.get_user(id).await?;
    Ok(success_response(ApiResponse::success(UserResponse::from(
        user,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
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
    info!(user_id = %user.id, email = %user.email, "user account created");

    Ok(created_response(ApiResponse::success(UserResponse::from(
        user,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 404, description = "No such user", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .update_user(
            id,
            UpdateUserInput {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: payload.role,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(success_response(ApiResponse::success(UserResponse::from(
        user,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No such user", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.users.delete_user(id).await?;
    info!(user_id = %id, "user account deleted");

    Ok(success_response(ApiResponse::<()>::message(
        "User deleted successfully",
    )))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/activate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User activated", body = ApiResponse<UserResponse>),
        (status = 404, description = "No such user", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.services.users.set_active(id, true).await?;

    Ok(success_response(
        ApiResponse::success(UserResponse::from(user)).with_message("User activated successfully"),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/deactivate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deactivated", body = ApiResponse<UserResponse>),
        (status = 404, description = "No such user", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.services.users.set_active(id, false).await?;

    Ok(success_response(
        ApiResponse::success(UserResponse::from(user))
            .with_message("User deactivated successfully"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_omits_password_hash() {
        let model = user::Model {
            id: Uuid::new_v4(),
            name: "Avery".into(),
            email: "avery@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: UserRole::Manager,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = UserResponse::from(model);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "manager");
        assert_eq!(json["email"], "avery@example.com");
    }

    #[test]
    fn create_request_rejects_short_password() {
        let request = CreateUserRequest {
            name: "Avery".into(),
            email: "avery@example.com".into(),
            password: "short".into(),
            role: UserRole::Staff,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let request = UpdateUserRequest {
            name: None,
            email: None,
            password: None,
            role: Some(UserRole::Admin),
            is_active: Some(false),
        };

        assert!(request.validate().is_ok());
    }
}

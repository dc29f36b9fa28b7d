use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::supplier::{self, PaymentTerms};
use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, default_page, default_per_page, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::services::suppliers::{CreateSupplierInput, SupplierFilter, UpdateSupplierInput};
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Supplier name must be between 1 and 200 characters"
    ))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Contact person is required"))]
    pub contact_person: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 50, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    /// Defaults to 3 when omitted
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    /// Defaults to NET30 when omitted
    pub payment_terms: Option<PaymentTerms>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub address_country: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Supplier name must be between 1 and 200 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Contact person is required"))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Phone is required"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    pub payment_terms: Option<PaymentTerms>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub address_country: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSuppliersQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Exact category match
    pub category: Option<String>,
    /// Restrict to active (`true`) or archived (`false`) suppliers
    pub active: Option<bool>,
    /// Case-insensitive match against name, contact person, and email
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    tag = "Suppliers",
    params(ListSuppliersQuery),
    responses(
        (status = 200, description = "Paginated supplier list, newest first", body = ApiResponse<PaginatedResponse<supplier::Model>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<ListSuppliersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = SupplierFilter {
        category: query.category,
        active: query.active,
        search: query.search,
    };
    let (suppliers, total) = state
        .services
        .suppliers
        .list_suppliers(filter, pagination.page, pagination.limit())
        .await?;

    Ok(success_response(ApiResponse::success(
        PaginatedResponse::new(suppliers, pagination.page, pagination.limit(), total),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier found", body = ApiResponse<supplier::Model>),
        (status = 404, description = "No such supplier", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state.services.suppliers.get_supplier(id).await?;
    Ok(success_response(ApiResponse::success(supplier)))
}

#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    tag = "Suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<supplier::Model>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .create_supplier(
            CreateSupplierInput {
                name: payload.name,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
                category: payload.category,
                rating: payload.rating,
                payment_terms: payload.payment_terms,
                address_street: payload.address_street,
                address_city: payload.address_city,
                address_state: payload.address_state,
                address_zip: payload.address_zip,
                address_country: payload.address_country,
                notes: payload.notes,
            },
            auth_user.id(),
        )
        .await?;

    Ok(created_response(ApiResponse::success(supplier)))
}

#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Supplier id")),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = ApiResponse<supplier::Model>),
        (status = 404, description = "No such supplier", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update_supplier(
            id,
            UpdateSupplierInput {
                name: payload.name,
                contact_person: payload.contact_person,
                email: payload.email,
                phone: payload.phone,
                category: payload.category,
                rating: payload.rating,
                payment_terms: payload.payment_terms,
                address_street: payload.address_street,
                address_city: payload.address_city,
                address_state: payload.address_state,
                address_zip: payload.address_zip,
                address_country: payload.address_country,
                notes: payload.notes,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(success_response(ApiResponse::success(supplier)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No such supplier", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.suppliers.delete_supplier(id).await?;
    info!(supplier_id = %id, "supplier deleted");

    Ok(success_response(ApiResponse::<()>::message(
        "Supplier deleted successfully",
    )))
}

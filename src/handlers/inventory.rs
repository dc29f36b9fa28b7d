use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::inventory_item::{self, non_negative_price};
use crate::errors::{ApiError, ServiceError};
use crate::handlers::common::{
    created_response, default_page, default_per_page, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::services::inventory::{CreateItemInput, ItemFilter, UpdateItemInput};
use crate::stock::{self, StockStatus};
use crate::{ApiResponse, AppState};

/// Inventory item plus the derived fields clients expect on every read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: String,
    pub quantity: i32,
    pub reorder_level: i32,
    pub unit_price: Decimal,
    pub supplier_id: Uuid,
    pub location: Option<String>,
    pub updated_by: Option<Uuid>,
    /// quantity x unit_price, computed on read
    pub total_value: Decimal,
    pub stock_status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventory_item::Model> for ItemResponse {
    fn from(item: inventory_item::Model) -> Self {
        let total_value = item.total_value();
        let stock_status = stock::classify(item.quantity, item.reorder_level);
        Self {
            id: item.id,
            name: item.name,
            sku: item.sku,
            description: item.description,
            category: item.category,
            quantity: item.quantity,
            reorder_level: item.reorder_level,
            unit_price: item.unit_price,
            supplier_id: item.supplier_id,
            location: item.location,
            updated_by: item.updated_by,
            total_value,
            stock_status,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Product name must be between 1 and 200 characters"
    ))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "SKU must be between 1 and 64 characters"))]
    pub sku: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    #[serde(default = "default_reorder_level")]
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: i32,
    /// Accepts the legacy `unitPrice` and `price` spellings on input.
    #[serde(alias = "unitPrice", alias = "price")]
    #[validate(custom = "non_negative_price")]
    pub unit_price: Decimal,
    pub supplier_id: Uuid,
    pub location: Option<String>,
}

fn default_reorder_level() -> i32 {
    10
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Product name must be between 1 and 200 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64, message = "SKU must be between 1 and 64 characters"))]
    pub sku: Option<String>,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i32>,
    #[serde(alias = "unitPrice", alias = "price")]
    #[validate(custom = "non_negative_price")]
    pub unit_price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub location: Option<String>,
}

impl UpdateItemRequest {
    /// True when the payload touches nothing but `quantity`.
    fn quantity_only(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.reorder_level.is_none()
            && self.unit_price.is_none()
            && self.supplier_id.is_none()
            && self.location.is_none()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListItemsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive match against name, SKU, and description
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    tag = "Inventory",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Paginated inventory list, most recently updated first", body = ApiResponse<PaginatedResponse<ItemResponse>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = ItemFilter {
        category: query.category,
        search: query.search,
    };
    let (items, total) = state
        .services
        .inventory
        .list_items(filter, pagination.page, pagination.limit())
        .await?;
    let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();

    Ok(success_response(ApiResponse::success(
        PaginatedResponse::new(items, pagination.page, pagination.limit(), total),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Item found", body = ApiResponse<ItemResponse>),
        (status = 404, description = "No such item", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(success_response(ApiResponse::success(ItemResponse::from(
        item,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    tag = "Inventory",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created; the stock rule may have opened an alert", body = ApiResponse<ItemResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already exists", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .inventory
        .create_item(
            CreateItemInput {
                name: payload.name,
                sku: payload.sku,
                description: payload.description,
                category: payload.category,
                quantity: payload.quantity,
                reorder_level: payload.reorder_level,
                unit_price: payload.unit_price,
                supplier_id: payload.supplier_id,
                location: payload.location,
            },
            auth_user.id(),
        )
        .await?;

    Ok(created_response(ApiResponse::success(ItemResponse::from(
        item,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated; the stock rule may have opened an alert", body = ApiResponse<ItemResponse>),
        (status = 403, description = "Staff may only change quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "No such item", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already exists", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    // Staff hold inventory:adjust, which only covers the quantity field.
    // Checked before the row lookup, so a forbidden payload answers 403
    // even for ids that do not exist.
    if auth_user.has_role("staff") && !payload.quantity_only() {
        return Err(
            ServiceError::Forbidden("Staff can only update quantity".to_string()).into(),
        );
    }

    let item = state
        .services
        .inventory
        .update_item(
            id,
            UpdateItemInput {
                name: payload.name,
                sku: payload.sku,
                description: payload.description,
                category: payload.category,
                quantity: payload.quantity,
                reorder_level: payload.reorder_level,
                unit_price: payload.unit_price,
                supplier_id: payload.supplier_id,
                location: payload.location,
            },
            auth_user.id(),
        )
        .await?;

    Ok(success_response(ApiResponse::success(ItemResponse::from(
        item,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No such item", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.inventory.delete_item(id).await?;
    info!(item_id = %id, "inventory item deleted");

    Ok(success_response(ApiResponse::<()>::message(
        "Inventory item deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, reorder_level: i32) -> inventory_item::Model {
        inventory_item::Model {
            id: Uuid::new_v4(),
            name: "Hex bolts M8".into(),
            sku: "BOLT-M8".into(),
            description: None,
            category: "fasteners".into(),
            quantity,
            reorder_level,
            unit_price: dec!(2.50),
            supplier_id: Uuid::new_v4(),
            location: Some("A-12".into()),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn response_derives_total_value_and_status() {
        let response = ItemResponse::from(item(8, 10));

        assert_eq!(response.total_value, dec!(20.00));
        assert_eq!(response.stock_status, StockStatus::LowStock);
    }

    #[test]
    fn response_marks_zero_quantity_out_of_stock() {
        let response = ItemResponse::from(item(0, 10));

        assert_eq!(response.stock_status, StockStatus::OutOfStock);
        assert_eq!(response.total_value, dec!(0.00));
    }

    #[test]
    fn create_request_accepts_legacy_price_spellings() {
        let canonical: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Hex bolts M8",
            "sku": "BOLT-M8",
            "category": "fasteners",
            "unit_price": "2.50",
            "supplier_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(canonical.unit_price, dec!(2.50));
        assert_eq!(canonical.quantity, 0);
        assert_eq!(canonical.reorder_level, 10);

        let legacy: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Hex bolts M8",
            "sku": "BOLT-M8",
            "category": "fasteners",
            "unitPrice": "3.75",
            "supplier_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(legacy.unit_price, dec!(3.75));
    }

    #[test]
    fn create_request_rejects_negative_quantity() {
        let request = CreateItemRequest {
            name: "Hex bolts M8".into(),
            sku: "BOLT-M8".into(),
            description: None,
            category: "fasteners".into(),
            quantity: -1,
            reorder_level: 10,
            unit_price: dec!(2.50),
            supplier_id: Uuid::new_v4(),
            location: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn quantity_only_detects_extra_fields() {
        let quantity_only = UpdateItemRequest {
            quantity: Some(5),
            ..Default::default()
        };
        assert!(quantity_only.quantity_only());

        let with_price = UpdateItemRequest {
            quantity: Some(5),
            unit_price: Some(dec!(9.99)),
            ..Default::default()
        };
        assert!(!with_price.quantity_only());
    }
}

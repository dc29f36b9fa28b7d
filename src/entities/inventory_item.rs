use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Inventory item entity.
///
/// `total_value` and `stock_status` are derived on read, never stored;
/// see [`crate::stock`] and the response types in `handlers::inventory`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = InventoryItem)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Product name must be between 1 and 200 characters"
    ))]
    pub name: String,

    /// Stock keeping unit, unique, stored uppercase
    #[validate(length(min = 1, max = 64, message = "SKU must be between 1 and 64 characters"))]
    pub sku: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    /// Units on hand, never negative
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,

    /// Threshold at or below which the item counts as low stock
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: i32,

    #[validate(custom = "non_negative_price")]
    pub unit_price: Decimal,

    /// Weak reference: the supplier row may have been deleted
    pub supplier_id: Uuid,

    pub location: Option<String>,

    /// User that performed the last mutation
    pub updated_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

pub fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("unit_price");
        err.message = Some("Unit price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Model {
    /// Derived `quantity x unit_price`
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        // SKUs compare case-insensitively, store the canonical uppercase form
        let normalized_sku = match &active_model.sku {
            ActiveValue::Set(sku) => Some(sku.trim().to_uppercase()),
            _ => None,
        };
        if let Some(sku) = normalized_sku {
            active_model.sku = Set(sku);
        }

        if insert {
            if let ActiveValue::NotSet = active_model.quantity {
                active_model.quantity = Set(0);
            }
            if let ActiveValue::NotSet = active_model.reorder_level {
                active_model.reorder_level = Set(10);
            }
            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Utc::now());

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        Ok(active_model)
    }
}

use crate::{
    entities::{alert, inventory_item},
    errors::ServiceError,
    stock,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait,
    ActiveValue::NotSet,
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Input for creating an inventory item
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: String,
    pub quantity: i32,
    pub reorder_level: i32,
    pub unit_price: Decimal,
    pub supplier_id: Uuid,
    pub location: Option<String>,
}

/// Input for updating an inventory item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub reorder_level: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub location: Option<String>,
}

/// Filters for listing inventory items
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Service for managing inventory items and the stock alert rule
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists inventory items, most recently updated first
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        filter: ItemFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let mut query = inventory_item::Entity::find();

        if let Some(category) = &filter.category {
            query = query.filter(inventory_item::Column::Category.eq(category.clone()));
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(lowered(inventory_item::Column::Name).like(&pattern))
                    .add(lowered(inventory_item::Column::Sku).like(&pattern))
                    .add(lowered(inventory_item::Column::Description).like(&pattern)),
            );
        }

        let paginator = query
            .order_by_desc(inventory_item::Column::UpdatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Gets an inventory item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<inventory_item::Model, ServiceError> {
        inventory_item::Entity::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Inventory item not found".to_string()))
    }

    /// Creates a new inventory item and runs the stock alert rule on it
    #[instrument(skip(self, input))]
    pub async fn create_item(
        &self,
        input: CreateItemInput,
        updated_by: Option<Uuid>,
    ) -> Result<inventory_item::Model, ServiceError> {
        self.ensure_unique_sku(&input.sku, None).await?;

        let item = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            sku: Set(input.sku),
            description: Set(input.description),
            category: Set(input.category),
            quantity: Set(input.quantity),
            reorder_level: Set(input.reorder_level),
            unit_price: Set(input.unit_price),
            supplier_id: Set(input.supplier_id),
            location: Set(input.location),
            updated_by: Set(updated_by),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let item = item.insert(&*self.db).await?;
        info!(item_id = %item.id, sku = %item.sku, "inventory item created");

        // The item row is already committed; an alert failure surfaces to the
        // caller but never rolls the item back.
        self.check_and_create_alert(&item).await?;

        Ok(item)
    }

    /// Updates an inventory item and runs the stock alert rule on the result
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateItemInput,
        updated_by: Option<Uuid>,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;

        if let Some(sku) = &input.sku {
            let normalized = sku.trim().to_uppercase();
            if normalized != item.sku {
                self.ensure_unique_sku(&normalized, Some(item_id)).await?;
            }
        }

        let mut item: inventory_item::ActiveModel = item.into();

        if let Some(name) = input.name {
            item.name = Set(name);
        }
        if let Some(sku) = input.sku {
            item.sku = Set(sku);
        }
        if let Some(description) = input.description {
            item.description = Set(Some(description));
        }
        if let Some(category) = input.category {
            item.category = Set(category);
        }
        if let Some(quantity) = input.quantity {
            item.quantity = Set(quantity);
        }
        if let Some(reorder_level) = input.reorder_level {
            item.reorder_level = Set(reorder_level);
        }
        if let Some(unit_price) = input.unit_price {
            item.unit_price = Set(unit_price);
        }
        if let Some(supplier_id) = input.supplier_id {
            item.supplier_id = Set(supplier_id);
        }
        if let Some(location) = input.location {
            item.location = Set(Some(location));
        }
        item.updated_by = Set(updated_by);
        item.updated_at = Set(Utc::now());

        let item = item.update(&*self.db).await?;
        info!(item_id = %item.id, quantity = item.quantity, "inventory item updated");

        self.check_and_create_alert(&item).await?;

        Ok(item)
    }

    /// Deletes an inventory item. Alerts referencing it are left in place.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let result = inventory_item::Entity::delete_by_id(item_id)
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(
                "Inventory item not found".to_string(),
            ));
        }
        info!(%item_id, "inventory item deleted");
        Ok(())
    }

    /// Rejects a SKU already used by a different item. SKUs are compared in
    /// their normalized (uppercased) form.
    async fn ensure_unique_sku(
        &self,
        sku: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let normalized = sku.trim().to_uppercase();

        let mut query = inventory_item::Entity::find()
            .filter(inventory_item::Column::Sku.eq(normalized));
        if let Some(id) = exclude {
            query = query.filter(inventory_item::Column::Id.ne(id));
        }

        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict("SKU already exists".to_string()));
        }
        Ok(())
    }

    /// Applies the stock alert rule: when the item sits at or under its
    /// reorder level and no unresolved alert of the matching type references
    /// it, insert one. Restocking never resolves anything here; resolution is
    /// an explicit operator action.
    async fn check_and_create_alert(
        &self,
        item: &inventory_item::Model,
    ) -> Result<(), ServiceError> {
        let Some(draft) = stock::evaluate(item) else {
            return Ok(());
        };

        let existing = alert::Entity::find()
            .filter(alert::Column::AlertType.eq(draft.alert_type))
            .filter(alert::Column::RelatedItem.eq(item.id))
            .filter(alert::Column::IsResolved.eq(false))
            .one(&*self.db)
            .await?;

        if existing.is_some() {
            return Ok(());
        }

        let alert = alert::ActiveModel {
            id: Set(Uuid::new_v4()),
            alert_type: Set(draft.alert_type),
            title: Set(draft.title),
            message: Set(draft.message),
            severity: Set(draft.severity),
            is_read: NotSet,
            is_resolved: NotSet,
            related_item: Set(Some(item.id)),
            related_supplier: Set(None),
            assigned_to: Set(None),
            resolved_by: Set(None),
            resolved_at: Set(None),
            expires_at: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let alert = alert.insert(&*self.db).await?;
        info!(
            alert_id = %alert.id,
            item_id = %item.id,
            alert_type = ?alert.alert_type,
            "stock alert created"
        );

        Ok(())
    }
}

/// Lowercased column expression for case-insensitive matching
fn lowered(column: inventory_item::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((inventory_item::Entity, column))))
}

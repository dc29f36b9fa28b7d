use crate::{
    entities::{supplier, PaymentTerms},
    errors::ServiceError,
};
use chrono::Utc;
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

/// Input for creating a supplier
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub rating: Option<i32>,
    pub payment_terms: Option<PaymentTerms>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub address_country: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a supplier. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
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

/// Filters for listing suppliers
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    pub category: Option<String>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

impl SupplierService {
    /// Creates a new supplier service instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists suppliers, newest first
    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        filter: SupplierFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let mut query = supplier::Entity::find();

        if let Some(category) = &filter.category {
            query = query.filter(supplier::Column::Category.eq(category.clone()));
        }
        if let Some(active) = filter.active {
            query = query.filter(supplier::Column::IsActive.eq(active));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(lowered(supplier::Column::Name).like(&pattern))
                    .add(lowered(supplier::Column::ContactPerson).like(&pattern))
                    .add(lowered(supplier::Column::Email).like(&pattern)),
            );
        }

        let paginator = query
            .order_by_desc(supplier::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let suppliers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((suppliers, total))
    }

    /// Gets a supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(&self, supplier_id: Uuid) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(supplier_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supplier not found".to_string()))
    }

    /// Creates a new supplier
    #[instrument(skip(self, input))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
        created_by: Option<Uuid>,
    ) -> Result<supplier::Model, ServiceError> {
        let supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            contact_person: Set(input.contact_person),
            email: Set(input.email),
            phone: Set(input.phone),
            category: Set(input.category),
            rating: input.rating.map_or(NotSet, Set),
            payment_terms: input.payment_terms.map_or(NotSet, Set),
            address_street: Set(input.address_street),
            address_city: Set(input.address_city),
            address_state: Set(input.address_state),
            address_zip: Set(input.address_zip),
            address_country: Set(input.address_country),
            notes: Set(input.notes),
            is_active: NotSet,
            created_by: Set(created_by),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let supplier = supplier.insert(&*self.db).await?;
        info!(supplier_id = %supplier.id, "supplier created");
        Ok(supplier)
    }

    /// Updates a supplier
    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let supplier = self.get_supplier(supplier_id).await?;

        let mut supplier: supplier::ActiveModel = supplier.into();

        if let Some(name) = input.name {
            supplier.name = Set(name);
        }
        if let Some(contact_person) = input.contact_person {
            supplier.contact_person = Set(contact_person);
        }
        if let Some(email) = input.email {
            supplier.email = Set(email);
        }
        if let Some(phone) = input.phone {
            supplier.phone = Set(phone);
        }
        if let Some(category) = input.category {
            supplier.category = Set(category);
        }
        if let Some(rating) = input.rating {
            supplier.rating = Set(rating);
        }
        if let Some(payment_terms) = input.payment_terms {
            supplier.payment_terms = Set(payment_terms);
        }
        if let Some(street) = input.address_street {
            supplier.address_street = Set(Some(street));
        }
        if let Some(city) = input.address_city {
            supplier.address_city = Set(Some(city));
        }
        if let Some(state) = input.address_state {
            supplier.address_state = Set(Some(state));
        }
        if let Some(zip) = input.address_zip {
            supplier.address_zip = Set(Some(zip));
        }
        if let Some(country) = input.address_country {
            supplier.address_country = Set(Some(country));
        }
        if let Some(notes) = input.notes {
            supplier.notes = Set(Some(notes));
        }
        if let Some(is_active) = input.is_active {
            supplier.is_active = Set(is_active);
        }
        supplier.updated_at = Set(Utc::now());

        let supplier = supplier.update(&*self.db).await?;
        info!(supplier_id = %supplier.id, "supplier updated");
        Ok(supplier)
    }

    /// Deletes a supplier. Inventory items referencing it are left in place.
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> Result<(), ServiceError> {
        let result = supplier::Entity::delete_by_id(supplier_id)
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Supplier not found".to_string()));
        }
        info!(%supplier_id, "supplier deleted");
        Ok(())
    }
}

/// Lowercased column expression for case-insensitive matching
fn lowered(column: supplier::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((supplier::Entity, column))))
}

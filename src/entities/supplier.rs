use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Payment terms negotiated with a supplier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentTerms {
    #[sea_orm(string_value = "NET15")]
    Net15,
    #[sea_orm(string_value = "NET30")]
    Net30,
    #[sea_orm(string_value = "NET45")]
    Net45,
    #[sea_orm(string_value = "NET60")]
    Net60,
    #[sea_orm(string_value = "COD")]
    Cod,
}

/// Supplier entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = Supplier)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

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

    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub address_country: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    /// Supplier quality rating, 1 (worst) to 5 (best)
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    pub payment_terms: PaymentTerms,

    pub is_active: bool,

    pub notes: Option<String>,

    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_item::Entity")]
    InventoryItems,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItems.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        let normalized_email = match &active_model.email {
            ActiveValue::Set(email) => Some(email.trim().to_lowercase()),
            _ => None,
        };
        if let Some(email) = normalized_email {
            active_model.email = Set(email);
        }

        if insert {
            if let ActiveValue::NotSet = active_model.rating {
                active_model.rating = Set(3);
            }
            if let ActiveValue::NotSet = active_model.payment_terms {
                active_model.payment_terms = Set(PaymentTerms::Net30);
            }
            if let ActiveValue::NotSet = active_model.is_active {
                active_model.is_active = Set(true);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_terms_serialize_as_legacy_codes() {
        assert_eq!(
            serde_json::to_string(&PaymentTerms::Net30).unwrap(),
            "\"NET30\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentTerms::Cod).unwrap(),
            "\"COD\""
        );
        let terms: PaymentTerms = serde_json::from_str("\"NET45\"").unwrap();
        assert_eq!(terms, PaymentTerms::Net45);
    }
}

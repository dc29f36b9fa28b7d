use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Alert categories
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AlertType {
    #[sea_orm(string_value = "low-stock")]
    LowStock,
    #[sea_orm(string_value = "out-of-stock")]
    OutOfStock,
    #[sea_orm(string_value = "reorder")]
    Reorder,
    #[sea_orm(string_value = "system")]
    System,
}

/// Alert severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "critical")]
    Critical,
}

/// Alert entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[schema(as = Alert)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Exposed as `type` in JSON for compatibility with existing clients
    #[serde(rename = "type")]
    pub alert_type: AlertType,

    #[validate(length(min = 1, max = 200, message = "Alert title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 1000, message = "Alert message is required"))]
    pub message: String,

    pub severity: AlertSeverity,

    pub is_read: bool,

    pub is_resolved: bool,

    /// Weak reference to the inventory item this alert concerns
    pub related_item: Option<Uuid>,

    /// Weak reference to a supplier, for supplier-centric alerts
    pub related_supplier: Option<Uuid>,

    /// User ids this alert has been assigned to
    #[sea_orm(column_type = "Json", nullable)]
    pub assigned_to: Option<Json>,

    pub resolved_by: Option<Uuid>,

    pub resolved_at: Option<DateTime<Utc>>,

    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.severity {
                active_model.severity = Set(AlertSeverity::Medium);
            }
            if let ActiveValue::NotSet = active_model.is_read {
                active_model.is_read = Set(false);
            }
            if let ActiveValue::NotSet = active_model.is_resolved {
                active_model.is_resolved = Set(false);
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

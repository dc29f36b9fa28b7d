use crate::{
    entities::{alert, AlertSeverity, AlertType},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Input for manually creating an alert
#[derive(Debug, Clone)]
pub struct CreateAlertInput {
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    pub severity: Option<AlertSeverity>,
    pub related_item: Option<Uuid>,
    pub related_supplier: Option<Uuid>,
    pub assigned_to: Option<Vec<Uuid>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Filters for listing alerts
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub alert_type: Option<AlertType>,
    pub severity: Option<AlertSeverity>,
    pub read: Option<bool>,
    pub resolved: Option<bool>,
}

/// Headline alert counters for the dashboard badge
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertStats {
    pub total: u64,
    pub unread: u64,
    pub unresolved: u64,
    pub critical: u64,
    pub high: u64,
}

/// Service for managing alerts
#[derive(Clone)]
pub struct AlertService {
    db: Arc<DatabaseConnection>,
}

impl AlertService {
    /// Creates a new alert service instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists alerts, newest first
    #[instrument(skip(self))]
    pub async fn list_alerts(
        &self,
        filter: AlertFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<alert::Model>, u64), ServiceError> {
        let mut query = alert::Entity::find();

        if let Some(alert_type) = filter.alert_type {
            query = query.filter(alert::Column::AlertType.eq(alert_type));
        }
        if let Some(severity) = filter.severity {
            query = query.filter(alert::Column::Severity.eq(severity));
        }
        if let Some(read) = filter.read {
            query = query.filter(alert::Column::IsRead.eq(read));
        }
        if let Some(resolved) = filter.resolved {
            query = query.filter(alert::Column::IsResolved.eq(resolved));
        }

        let paginator = query
            .order_by_desc(alert::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let alerts = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((alerts, total))
    }

    /// Gets an alert by ID
    #[instrument(skip(self))]
    pub async fn get_alert(&self, alert_id: Uuid) -> Result<alert::Model, ServiceError> {
        alert::Entity::find_by_id(alert_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))
    }

    /// Counts alerts for the stats endpoint. The five counters are
    /// independent queries issued concurrently.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<AlertStats, ServiceError> {
        let db = &*self.db;

        let (total, unread, unresolved, critical, high) = tokio::try_join!(
            alert::Entity::find().count(db),
            alert::Entity::find()
                .filter(alert::Column::IsRead.eq(false))
                .count(db),
            alert::Entity::find()
                .filter(alert::Column::IsResolved.eq(false))
                .count(db),
            alert::Entity::find()
                .filter(alert::Column::Severity.eq(AlertSeverity::Critical))
                .count(db),
            alert::Entity::find()
                .filter(alert::Column::Severity.eq(AlertSeverity::High))
                .count(db),
        )?;

        Ok(AlertStats {
            total,
            unread,
            unresolved,
            critical,
            high,
        })
    }

    /// Creates an alert from operator input
    #[instrument(skip(self, input))]
    pub async fn create_alert(&self, input: CreateAlertInput) -> Result<alert::Model, ServiceError> {
        let assigned_to = input
            .assigned_to
            .map(|user_ids| serde_json::json!(user_ids));

        let alert = alert::ActiveModel {
            id: Set(Uuid::new_v4()),
            alert_type: Set(input.alert_type),
            title: Set(input.title),
            message: Set(input.message),
            severity: input.severity.map_or(NotSet, Set),
            is_read: NotSet,
            is_resolved: NotSet,
            related_item: Set(input.related_item),
            related_supplier: Set(input.related_supplier),
            assigned_to: Set(assigned_to),
            resolved_by: Set(None),
            resolved_at: Set(None),
            expires_at: Set(input.expires_at),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let alert = alert.insert(&*self.db).await?;
        info!(alert_id = %alert.id, alert_type = ?alert.alert_type, "alert created");
        Ok(alert)
    }

    /// Marks a single alert as read
    #[instrument(skip(self))]
    pub async fn mark_read(&self, alert_id: Uuid) -> Result<alert::Model, ServiceError> {
        let alert = self.get_alert(alert_id).await?;

        let mut alert: alert::ActiveModel = alert.into();
        alert.is_read = Set(true);
        alert.updated_at = Set(Utc::now());

        alert.update(&*self.db).await.map_err(Into::into)
    }

    /// Marks every unread alert as read, returning how many rows changed
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<u64, ServiceError> {
        let result = alert::Entity::update_many()
            .col_expr(alert::Column::IsRead, Expr::value(true))
            .col_expr(alert::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(alert::Column::IsRead.eq(false))
            .exec(&*self.db)
            .await?;

        info!(count = result.rows_affected, "alerts marked as read");
        Ok(result.rows_affected)
    }

    /// Resolves an alert, stamping who resolved it and when
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        alert_id: Uuid,
        resolved_by: Option<Uuid>,
    ) -> Result<alert::Model, ServiceError> {
        let alert = self.get_alert(alert_id).await?;

        let mut alert: alert::ActiveModel = alert.into();
        alert.is_resolved = Set(true);
        alert.resolved_by = Set(resolved_by);
        alert.resolved_at = Set(Some(Utc::now()));
        alert.updated_at = Set(Utc::now());

        let alert = alert.update(&*self.db).await?;
        info!(alert_id = %alert.id, "alert resolved");
        Ok(alert)
    }

    /// Deletes an alert
    #[instrument(skip(self))]
    pub async fn delete_alert(&self, alert_id: Uuid) -> Result<(), ServiceError> {
        let result = alert::Entity::delete_by_id(alert_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Alert not found".to_string()));
        }
        info!(%alert_id, "alert deleted");
        Ok(())
    }
}

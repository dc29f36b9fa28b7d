use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::alert::{self, AlertSeverity, AlertType};
use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, default_page, default_per_page, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::services::alerts::{AlertFilter, AlertStats, CreateAlertInput};
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlertRequest {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[validate(length(min = 1, max = 200, message = "Alert title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Alert message is required"))]
    pub message: String,
    /// Defaults to medium when omitted
    pub severity: Option<AlertSeverity>,
    pub related_item: Option<Uuid>,
    pub related_supplier: Option<Uuid>,
    pub assigned_to: Option<Vec<Uuid>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAlertsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Restrict to one alert type
    #[serde(rename = "type")]
    pub alert_type: Option<AlertType>,
    /// Restrict to one severity
    pub severity: Option<AlertSeverity>,
    /// Filter on the read flag
    pub read: Option<bool>,
    /// Filter on the resolved flag
    pub resolved: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    tag = "Alerts",
    params(ListAlertsQuery),
    responses(
        (status = 200, description = "Paginated alert list, newest first", body = ApiResponse<PaginatedResponse<alert::Model>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListAlertsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = AlertFilter {
        alert_type: query.alert_type,
        severity: query.severity,
        read: query.read,
        resolved: query.resolved,
    };
    let (alerts, total) = state
        .services
        .alerts
        .list_alerts(filter, pagination.page, pagination.limit())
        .await?;

    Ok(success_response(ApiResponse::success(
        PaginatedResponse::new(alerts, pagination.page, pagination.limit(), total),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts/stats",
    tag = "Alerts",
    responses(
        (status = 200, description = "Headline alert counters", body = ApiResponse<AlertStats>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn alert_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.services.alerts.get_stats().await?;
    Ok(success_response(ApiResponse::success(stats)))
}

#[utoipa::path(
    post,
    path = "/api/v1/alerts",
    tag = "Alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = ApiResponse<alert::Model>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_alert(
    State(state): State<AppState>,
    Json(payload): Json<CreateAlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let alert = state
        .services
        .alerts
        .create_alert(CreateAlertInput {
            alert_type: payload.alert_type,
            title: payload.title,
            message: payload.message,
            severity: payload.severity,
            related_item: payload.related_item,
            related_supplier: payload.related_supplier,
            assigned_to: payload.assigned_to,
            expires_at: payload.expires_at,
        })
        .await?;

    Ok(created_response(ApiResponse::success(alert)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/alerts/{id}/read",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Alert marked as read", body = ApiResponse<alert::Model>),
        (status = 404, description = "No such alert", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_alert_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = state.services.alerts.mark_read(id).await?;
    Ok(success_response(ApiResponse::success(alert)))
}

#[utoipa::path(
    put,
    path = "/api/v1/alerts/mark-all-read",
    tag = "Alerts",
    responses(
        (status = 200, description = "Every unread alert marked as read", body = ApiResponse<serde_json::Value>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_all_alerts_read(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.services.alerts.mark_all_read().await?;
    info!(updated, "marked all alerts as read");

    Ok(success_response(ApiResponse::<()>::message(
        "All alerts marked as read",
    )))
}

#[utoipa::path(
    patch,
    path = "/api/v1/alerts/{id}/resolve",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Alert resolved, stamped with the resolving user and time", body = ApiResponse<alert::Model>),
        (status = 404, description = "No such alert", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = state.services.alerts.resolve(id, auth_user.id()).await?;
    Ok(success_response(ApiResponse::success(alert)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/alerts/{id}",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Alert deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No such alert", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.alerts.delete_alert(id).await?;
    info!(alert_id = %id, "alert deleted");

    Ok(success_response(ApiResponse::<()>::message(
        "Alert deleted successfully",
    )))
}

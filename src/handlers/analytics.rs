use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::errors::ApiError;
use crate::export::{self, ExportFormat};
use crate::handlers::common::{attachment_response, success_response};
use crate::services::analytics::DashboardAnalytics;
use crate::{ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    tag = "Analytics",
    responses(
        (status = 200, description = "Dashboard metrics, trends, and KPIs", body = ApiResponse<DashboardAnalytics>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let analytics = state.services.analytics.get_dashboard().await?;
    Ok(success_response(ApiResponse::success(analytics)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// csv (default), pdf, or xlsx (alias: excel)
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ExportRequest {
    /// csv (default), pdf, or xlsx (alias: excel)
    pub format: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/export",
    tag = "Analytics",
    params(ExportQuery),
    responses(
        (status = 200, description = "Inventory summary as a file attachment")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_analytics(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    run_export(&state, query.format.as_deref()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/analytics/export",
    tag = "Analytics",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Inventory summary as a file attachment")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_analytics_post(
    State(state): State<AppState>,
    body: Option<Json<ExportRequest>>,
) -> Result<Response, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    run_export(&state, request.format.as_deref()).await
}

// Unknown format strings fall back to CSV rather than erroring, so a stale
// client still gets a usable download.
async fn run_export(state: &AppState, format: Option<&str>) -> Result<Response, ApiError> {
    let format = format
        .and_then(ExportFormat::parse)
        .unwrap_or(ExportFormat::Csv);
    let summary = state.services.analytics.get_export_summary().await?;
    let file = export::analytics_export(&summary, format)?;

    Ok(attachment_response(file))
}

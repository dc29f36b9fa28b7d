use axum::{
    extract::{Query, State},
    response::Response,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::errors::ApiError;
use crate::export::{self, ExportFormat};
use crate::handlers::common::attachment_response;
use crate::AppState;

/// Report generation endpoints. The whole router is restricted to
/// administrators when it is mounted.
pub fn reports_routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate_report))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GenerateReportQuery {
    /// pdf (default) or csv
    pub format: Option<String>,
    /// Start of the reporting window, RFC 3339. Defaults to 30 days ago.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the reporting window, RFC 3339. Defaults to now.
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateReportRequest {
    /// pdf (default) or csv
    pub format: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reports/generate",
    tag = "Reports",
    params(GenerateReportQuery),
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Operational report as a file attachment"),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_report(
    State(state): State<AppState>,
    Query(query): Query<GenerateReportQuery>,
    body: Option<Json<GenerateReportRequest>>,
) -> Result<Response, ApiError> {
    // Parameters may arrive in the query string, the JSON body, or both.
    // Body values win.
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let format = request.format.or(query.format);
    let start = request.start_date.or(query.start_date);
    let end = request.end_date.or(query.end_date);

    let format = match format.as_deref() {
        Some("csv") => ExportFormat::Csv,
        _ => ExportFormat::Pdf,
    };

    let report = state.services.reports.generate(start, end).await?;
    let file = export::report_export(&report, format)?;

    Ok(attachment_response(file))
}

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockIQ API",
        version = "0.1.0",
        description = r#"
# StockIQ Inventory & Supply Chain API

Multi-role inventory tracking for warehouse teams: stock level alerts,
supplier management, dashboard analytics, and report exports.

## Authentication

Obtain a token from `POST /api/v1/auth/login` and send it on every other
request:

```
Authorization: Bearer <your-jwt-token>
```

Roles are `admin`, `manager`, and `staff`; each carries a fixed permission
set and admins pass every permission check.

## Errors

Failures share one body shape:

```json
{
  "success": false,
  "error": "Not Found",
  "message": "Inventory item not found",
  "request_id": "...",
  "timestamp": "2025-07-09T10:30:00.000Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20,
max 100) and wrap results as `{ "items": [...], "pagination": {...} }`.
        "#,
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Login and session endpoints"),
        (name = "Users", description = "User administration (admin only)"),
        (name = "Inventory", description = "Inventory item management"),
        (name = "Suppliers", description = "Supplier records"),
        (name = "Alerts", description = "Stock and system alerts"),
        (name = "Analytics", description = "Dashboard metrics and exports"),
        (name = "Reports", description = "Operational report generation (admin only)")
    ),
    paths(
        // Auth
        crate::handlers::auth::login,
        crate::handlers::auth::register,
        crate::handlers::auth::me,

        // Users
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::users::activate_user,
        crate::handlers::users::deactivate_user,

        // Inventory
        crate::handlers::inventory::list_items,
        crate::handlers::inventory::get_item,
        crate::handlers::inventory::create_item,
        crate::handlers::inventory::update_item,
        crate::handlers::inventory::delete_item,

        // Suppliers
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,

        // Alerts
        crate::handlers::alerts::list_alerts,
        crate::handlers::alerts::alert_stats,
        crate::handlers::alerts::create_alert,
        crate::handlers::alerts::mark_alert_read,
        crate::handlers::alerts::mark_all_alerts_read,
        crate::handlers::alerts::resolve_alert,
        crate::handlers::alerts::delete_alert,

        // Analytics
        crate::handlers::analytics::dashboard,
        crate::handlers::analytics::export_analytics,
        crate::handlers::analytics::export_analytics_post,

        // Reports
        crate::handlers::reports::generate_report,
    ),
    components(
        schemas(
            // Envelope
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::PaginatedResponse<serde_json::Value>,
            crate::handlers::common::PaginationMeta,
            crate::errors::ErrorResponse,

            // Auth
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::SessionUser,

            // Users
            crate::handlers::users::UserResponse,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::entities::user::UserRole,

            // Inventory
            crate::handlers::inventory::ItemResponse,
            crate::handlers::inventory::CreateItemRequest,
            crate::handlers::inventory::UpdateItemRequest,
            crate::stock::StockStatus,

            // Suppliers
            crate::entities::supplier::Model,
            crate::entities::supplier::PaymentTerms,
            crate::handlers::suppliers::CreateSupplierRequest,
            crate::handlers::suppliers::UpdateSupplierRequest,

            // Alerts
            crate::entities::alert::Model,
            crate::entities::alert::AlertType,
            crate::entities::alert::AlertSeverity,
            crate::handlers::alerts::CreateAlertRequest,
            crate::services::alerts::AlertStats,

            // Analytics & reports
            crate::services::analytics::DashboardAnalytics,
            crate::services::analytics::InventoryStats,
            crate::services::analytics::SupplierStats,
            crate::services::analytics::Kpis,
            crate::services::analytics::MonthTrend,
            crate::services::analytics::DayTrend,
            crate::services::analytics::TopSupplier,
            crate::handlers::analytics::ExportRequest,
            crate::handlers::reports::GenerateReportRequest,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Swagger UI mounted at `/docs`, serving the spec from
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_spec_covers_the_api() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();

        assert!(json.contains("StockIQ API"));
        assert!(json.contains("/api/v1/inventory"));
        assert!(json.contains("/api/v1/alerts/mark-all-read"));
        assert!(json.contains("/api/v1/reports/generate"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn export_path_documents_both_methods() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let export = paths
            .get("/api/v1/analytics/export")
            .expect("export path missing");
        assert!(export.get.is_some());
        assert!(export.post.is_some());
    }
}

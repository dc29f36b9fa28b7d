//! StockIQ API library.
//!
//! Inventory and supply-chain tracking for warehouse teams: stock level
//! alerts, supplier records, role-based access, dashboard analytics,
//! and report exports.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod stock;
pub mod tracing;

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::auth::consts as perm;
use crate::auth::{AuthConfig, AuthRouterExt, AuthService};

/// Shared application state threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth_service: Arc<AuthService>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let auth_service = Arc::new(AuthService::new(AuthConfig::from_app_config(&config)));
        let services = handlers::AppServices::new(db.clone(), auth_service.clone());
        Self {
            db,
            config,
            auth_service,
            services,
        }
    }
}

/// Standard success envelope for JSON responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Per-response metadata for client-side correlation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    /// Attaches a human-readable note to a success envelope.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success envelope that carries only a message, no data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Builds the `/api/v1` route tree. Auth and permission layers are attached
/// per route group; routes not behind a group (health, login) stay public.
pub fn api_v1_routes() -> Router<AppState> {
    use axum::routing::{delete, patch, post, put};

    let inventory_read = Router::new()
        .route("/inventory", get(handlers::inventory::list_items))
        .route("/inventory/:id", get(handlers::inventory::get_item))
        .with_permission(perm::INVENTORY_READ);
    let inventory_write = Router::new()
        .route("/inventory", post(handlers::inventory::create_item))
        .route("/inventory/:id", delete(handlers::inventory::delete_item))
        .with_permission(perm::INVENTORY_WRITE);
    // Staff reach the update handler through inventory:adjust; the handler
    // itself rejects staff payloads that touch more than quantity.
    let inventory_adjust = Router::new()
        .route("/inventory/:id", put(handlers::inventory::update_item))
        .with_permission(perm::INVENTORY_ADJUST);

    let suppliers_read = Router::new()
        .route("/suppliers", get(handlers::suppliers::list_suppliers))
        .route("/suppliers/:id", get(handlers::suppliers::get_supplier))
        .with_permission(perm::SUPPLIERS_READ);
    let suppliers_write = Router::new()
        .route("/suppliers", post(handlers::suppliers::create_supplier))
        .route("/suppliers/:id", put(handlers::suppliers::update_supplier))
        .with_permission(perm::SUPPLIERS_WRITE);
    let suppliers_delete = Router::new()
        .route("/suppliers/:id", delete(handlers::suppliers::delete_supplier))
        .with_permission(perm::SUPPLIERS_DELETE);

    let alerts_read = Router::new()
        .route("/alerts", get(handlers::alerts::list_alerts))
        .route("/alerts/stats", get(handlers::alerts::alert_stats))
        .route("/alerts/:id/read", patch(handlers::alerts::mark_alert_read))
        .route(
            "/alerts/mark-all-read",
            put(handlers::alerts::mark_all_alerts_read),
        )
        .with_permission(perm::ALERTS_READ);
    let alerts_write = Router::new()
        .route("/alerts", post(handlers::alerts::create_alert))
        .route("/alerts/:id/resolve", patch(handlers::alerts::resolve_alert))
        .with_permission(perm::ALERTS_WRITE);
    let alerts_delete = Router::new()
        .route("/alerts/:id", delete(handlers::alerts::delete_alert))
        .with_permission(perm::ALERTS_DELETE);

    let analytics_read = Router::new()
        .route("/analytics", get(handlers::analytics::dashboard))
        .with_permission(perm::ANALYTICS_READ);
    let analytics_export = Router::new()
        .route(
            "/analytics/export",
            get(handlers::analytics::export_analytics)
                .post(handlers::analytics::export_analytics_post),
        )
        .with_permission(perm::ANALYTICS_EXPORT);

    let users = handlers::users::users_routes().with_role("admin");
    let reports = handlers::reports::reports_routes().with_role("admin");

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", handlers::auth::auth_routes())
        .merge(inventory_read)
        .merge(inventory_write)
        .merge(inventory_adjust)
        .merge(suppliers_read)
        .merge(suppliers_write)
        .merge(suppliers_delete)
        .merge(alerts_read)
        .merge(alerts_write)
        .merge(alerts_delete)
        .merge(analytics_read)
        .merge(analytics_export)
        .nest("/users", users)
        .nest("/reports", reports)
}

async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    });

    Json(ApiResponse::success(health_data))
}

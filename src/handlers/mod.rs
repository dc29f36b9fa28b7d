pub mod alerts;
pub mod analytics;
pub mod auth;
pub mod common;
pub mod inventory;
pub mod reports;
pub mod suppliers;
pub mod users;

use crate::auth::AuthService;
use crate::services::{
    alerts::AlertService, analytics::AnalyticsService, inventory::InventoryService,
    reports::ReportsService, suppliers::SupplierService, users::UserService,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Handles to every domain service, shared across the routers through
/// the application state
#[derive(Clone)]
pub struct AppServices {
    pub users: UserService,
    pub inventory: InventoryService,
    pub suppliers: SupplierService,
    pub alerts: AlertService,
    pub analytics: AnalyticsService,
    pub reports: ReportsService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        Self {
            users: UserService::new(db.clone(), auth),
            inventory: InventoryService::new(db.clone()),
            suppliers: SupplierService::new(db.clone()),
            alerts: AlertService::new(db.clone()),
            analytics: AnalyticsService::new(db.clone()),
            reports: ReportsService::new(db),
        }
    }
}

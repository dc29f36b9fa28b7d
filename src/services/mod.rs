// Core resource services
pub mod alerts;
pub mod inventory;
pub mod suppliers;
pub mod users;

// Aggregation reporters
pub mod analytics;
pub mod reports;

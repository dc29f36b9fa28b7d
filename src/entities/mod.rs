pub mod alert;
pub mod inventory_item;
pub mod supplier;
pub mod user;

pub use alert::{AlertSeverity, AlertType};
pub use supplier::PaymentTerms;
pub use user::UserRole;

/*!
 * # Permissions Module
 *
 * This module defines permissions for resources in the system.
 * Permissions are organized by resource type and action, and each
 * account role maps to a fixed permission set.
 */

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::entities::UserRole;

/// Permission actions
pub struct Actions;

impl Actions {
    pub const READ: &'static str = "read";
    pub const WRITE: &'static str = "write";
    pub const ADJUST: &'static str = "adjust";
    pub const DELETE: &'static str = "delete";
    pub const MANAGE: &'static str = "manage";
    pub const EXPORT: &'static str = "export";
    pub const GENERATE: &'static str = "generate";
}

/// Resource types
pub struct Resources;

impl Resources {
    pub const INVENTORY: &'static str = "inventory";
    pub const SUPPLIERS: &'static str = "suppliers";
    pub const USERS: &'static str = "users";
    pub const ALERTS: &'static str = "alerts";
    pub const ANALYTICS: &'static str = "analytics";
    pub const REPORTS: &'static str = "reports";
}

/// Common permission string constants for compile-time safety
pub mod consts {
    // Inventory
    pub const INVENTORY_READ: &str = "inventory:read";
    pub const INVENTORY_WRITE: &str = "inventory:write";
    pub const INVENTORY_ADJUST: &str = "inventory:adjust";

    // Suppliers
    pub const SUPPLIERS_READ: &str = "suppliers:read";
    pub const SUPPLIERS_WRITE: &str = "suppliers:write";
    pub const SUPPLIERS_DELETE: &str = "suppliers:delete";

    // User administration
    pub const USERS_MANAGE: &str = "users:manage";

    // Alerts
    pub const ALERTS_READ: &str = "alerts:read";
    pub const ALERTS_WRITE: &str = "alerts:write";
    pub const ALERTS_DELETE: &str = "alerts:delete";

    // Analytics & exports
    pub const ANALYTICS_READ: &str = "analytics:read";
    pub const ANALYTICS_EXPORT: &str = "analytics:export";

    // Reports
    pub const REPORTS_GENERATE: &str = "reports:generate";
}

/// Format a permission string
pub fn format_permission(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

// Role to permission-set mapping. Admins additionally bypass permission
// checks in the middleware, so their entry only matters for token contents.
lazy_static! {
    pub static ref ROLE_PERMISSIONS: HashMap<UserRole, Vec<&'static str>> = {
        let mut map = HashMap::new();

        map.insert(
            UserRole::Admin,
            vec![
                consts::INVENTORY_READ,
                consts::INVENTORY_WRITE,
                consts::INVENTORY_ADJUST,
                consts::SUPPLIERS_READ,
                consts::SUPPLIERS_WRITE,
                consts::SUPPLIERS_DELETE,
                consts::USERS_MANAGE,
                consts::ALERTS_READ,
                consts::ALERTS_WRITE,
                consts::ALERTS_DELETE,
                consts::ANALYTICS_READ,
                consts::ANALYTICS_EXPORT,
                consts::REPORTS_GENERATE,
            ],
        );

        map.insert(
            UserRole::Manager,
            vec![
                consts::INVENTORY_READ,
                consts::INVENTORY_WRITE,
                consts::INVENTORY_ADJUST,
                consts::SUPPLIERS_READ,
                consts::SUPPLIERS_WRITE,
                consts::ALERTS_READ,
                consts::ALERTS_WRITE,
                consts::ANALYTICS_READ,
                consts::ANALYTICS_EXPORT,
            ],
        );

        // Staff can adjust stock levels but not rewrite item records;
        // the inventory service additionally restricts their updates to
        // the quantity field.
        map.insert(
            UserRole::Staff,
            vec![
                consts::INVENTORY_READ,
                consts::INVENTORY_ADJUST,
                consts::SUPPLIERS_READ,
                consts::ALERTS_READ,
                consts::ANALYTICS_READ,
            ],
        );

        map
    };
}

/// Permissions granted to a role, as owned strings ready for token claims.
pub fn role_permissions(role: &UserRole) -> Vec<String> {
    ROLE_PERMISSIONS
        .get(role)
        .map(|perms| perms.iter().map(|p| p.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_permission() {
        let perms = role_permissions(&UserRole::Admin);
        for p in [
            consts::INVENTORY_WRITE,
            consts::SUPPLIERS_DELETE,
            consts::USERS_MANAGE,
            consts::ALERTS_DELETE,
            consts::ANALYTICS_EXPORT,
            consts::REPORTS_GENERATE,
        ] {
            assert!(perms.iter().any(|x| x == p), "admin missing {}", p);
        }
    }

    #[test]
    fn manager_cannot_delete_suppliers_or_manage_users() {
        let perms = role_permissions(&UserRole::Manager);
        assert!(perms.iter().any(|p| p == consts::SUPPLIERS_WRITE));
        assert!(!perms.iter().any(|p| p == consts::SUPPLIERS_DELETE));
        assert!(!perms.iter().any(|p| p == consts::USERS_MANAGE));
        assert!(!perms.iter().any(|p| p == consts::REPORTS_GENERATE));
    }

    #[test]
    fn staff_adjusts_but_never_writes_inventory() {
        let perms = role_permissions(&UserRole::Staff);
        assert!(perms.iter().any(|p| p == consts::INVENTORY_ADJUST));
        assert!(!perms.iter().any(|p| p == consts::INVENTORY_WRITE));
        assert!(!perms.iter().any(|p| p == consts::ALERTS_WRITE));
        assert!(!perms.iter().any(|p| p == consts::ANALYTICS_EXPORT));
    }

    #[test]
    fn format_permission_joins_resource_and_action() {
        assert_eq!(
            format_permission(Resources::INVENTORY, Actions::READ),
            consts::INVENTORY_READ
        );
        assert_eq!(
            format_permission(Resources::REPORTS, Actions::GENERATE),
            consts::REPORTS_GENERATE
        );
    }
}

use crate::entities::inventory_item;
use crate::entities::{AlertSeverity, AlertType};

use super::status::{classify, StockStatus};

/// A decision to raise a stock alert, produced by [`evaluate`].
///
/// The draft is pure data; persistence and deduplication happen in the
/// alerts service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

/// Decides whether a stock mutation should open an alert for `item`.
///
/// The rule runs against the item state *after* the mutation. It is
/// one-directional: it only ever opens alerts, it never resolves them,
/// so restocking an item above its reorder level returns `None` and
/// leaves any outstanding alerts untouched.
pub fn evaluate(item: &inventory_item::Model) -> Option<AlertDraft> {
    match classify(item.quantity, item.reorder_level) {
        StockStatus::InStock => None,
        StockStatus::OutOfStock => Some(AlertDraft {
            alert_type: AlertType::OutOfStock,
            severity: AlertSeverity::Critical,
            title: "Out of Stock Alert".to_string(),
            message: format!("{} ({}) is out of stock", item.name, item.sku),
        }),
        StockStatus::LowStock => Some(AlertDraft {
            alert_type: AlertType::LowStock,
            severity: AlertSeverity::High,
            title: "Low Stock Alert".to_string(),
            message: format!(
                "{} ({}) is running low ({} left)",
                item.name, item.sku, item.quantity
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(quantity: i32, reorder_level: i32) -> inventory_item::Model {
        inventory_item::Model {
            id: Uuid::new_v4(),
            name: "Hex Bolt".into(),
            sku: "HB-010".into(),
            description: None,
            category: "Fasteners".into(),
            quantity,
            reorder_level,
            unit_price: dec!(0.12),
            supplier_id: Uuid::new_v4(),
            location: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn adequately_stocked_items_raise_nothing() {
        assert_eq!(evaluate(&item(11, 10)), None);
        assert_eq!(evaluate(&item(100, 0)), None);
    }

    #[test]
    fn empty_stock_raises_critical_out_of_stock() {
        let draft = evaluate(&item(0, 10)).expect("alert expected");
        assert_eq!(draft.alert_type, AlertType::OutOfStock);
        assert_eq!(draft.severity, AlertSeverity::Critical);
        assert_eq!(draft.title, "Out of Stock Alert");
        assert_eq!(draft.message, "Hex Bolt (HB-010) is out of stock");
    }

    #[test]
    fn low_stock_raises_high_severity_with_count() {
        let draft = evaluate(&item(3, 10)).expect("alert expected");
        assert_eq!(draft.alert_type, AlertType::LowStock);
        assert_eq!(draft.severity, AlertSeverity::High);
        assert_eq!(draft.title, "Low Stock Alert");
        assert_eq!(draft.message, "Hex Bolt (HB-010) is running low (3 left)");
    }

    #[test]
    fn boundary_quantity_counts_as_low_stock() {
        let draft = evaluate(&item(10, 10)).expect("alert expected");
        assert_eq!(draft.alert_type, AlertType::LowStock);
        assert_eq!(draft.message, "Hex Bolt (HB-010) is running low (10 left)");
    }
}

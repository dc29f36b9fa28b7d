use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stock status of an inventory item, derived from quantity and reorder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::OutOfStock => "out-of-stock",
        }
    }
}

/// Classifies an item's stock level.
///
/// A quantity of zero is always `out-of-stock`. Otherwise the reorder
/// level is an inclusive low boundary: quantity equal to the reorder
/// level still counts as `low-stock`.
pub fn classify(quantity: i32, reorder_level: i32) -> StockStatus {
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= reorder_level {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

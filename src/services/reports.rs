use crate::{
    entities::{alert, inventory_item, supplier, user, AlertType, UserRole},
    errors::ServiceError,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Iterable, QueryFilter};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Reporting window, inclusive on both ends
#[derive(Debug, Clone, Copy)]
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct InventorySummary {
    pub total_items: u64,
    pub total_value: Decimal,
    pub low_stock_items: u64,
    pub out_of_stock_items: u64,
    pub avg_price: Decimal,
    pub avg_quantity: f64,
}

#[derive(Debug, Clone)]
pub struct CategoryStat {
    pub category: String,
    pub item_count: u64,
    pub total_value: Decimal,
    pub avg_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct SupplierPerformance {
    pub name: String,
    pub item_count: u64,
    pub total_value: Decimal,
}

#[derive(Debug, Clone)]
pub struct RoleBreakdown {
    pub role: UserRole,
    pub count: u64,
    pub active_count: u64,
}

#[derive(Debug, Clone)]
pub struct AlertTypeBreakdown {
    pub alert_type: AlertType,
    pub count: u64,
    pub resolved: u64,
}

/// Everything a generated report renders, independent of output format
#[derive(Debug, Clone)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub period: ReportPeriod,
    pub inventory: InventorySummary,
    pub categories: Vec<CategoryStat>,
    pub supplier_total: u64,
    pub suppliers: Vec<SupplierPerformance>,
    pub user_total: u64,
    pub users: Vec<RoleBreakdown>,
    pub alert_total: u64,
    pub alerts: Vec<AlertTypeBreakdown>,
}

#[derive(Clone)]
pub struct ReportsService {
    db: Arc<DatabaseConnection>,
}

impl ReportsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Gathers every section of the system report in one pass.
    ///
    /// Inventory, supplier and user sections always cover the whole
    /// database; only the alert section is restricted to the period.
    /// Omitted bounds default to the last thirty days ending now.
    pub async fn generate(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<ReportData, ServiceError> {
        let now = Utc::now();
        let period = ReportPeriod {
            start: start.unwrap_or(now - Duration::days(30)),
            end: end.unwrap_or(now),
        };

        let (items, suppliers, users, alerts) = tokio::try_join!(
            inventory_item::Entity::find().all(&*self.db),
            supplier::Entity::find().all(&*self.db),
            user::Entity::find().all(&*self.db),
            alert::Entity::find()
                .filter(alert::Column::CreatedAt.gte(period.start))
                .filter(alert::Column::CreatedAt.lte(period.end))
                .all(&*self.db),
        )?;

        Ok(ReportData {
            generated_at: now,
            period,
            inventory: summarize_items(&items),
            categories: category_stats(&items),
            supplier_total: suppliers.len() as u64,
            suppliers: supplier_performance(&suppliers, &items),
            user_total: users.len() as u64,
            users: users_by_role(&users),
            alert_total: alerts.len() as u64,
            alerts: alert_breakdown(&alerts),
        })
    }
}

fn summarize_items(items: &[inventory_item::Model]) -> InventorySummary {
    let total_items = items.len() as u64;
    let total_value: Decimal = items.iter().map(inventory_item::Model::total_value).sum();
    let price_sum: Decimal = items.iter().map(|i| i.unit_price).sum();
    let quantity_sum: i64 = items.iter().map(|i| i64::from(i.quantity)).sum();

    let (avg_price, avg_quantity) = if total_items == 0 {
        (Decimal::ZERO, 0.0)
    } else {
        (
            price_sum / Decimal::from(total_items),
            quantity_sum as f64 / total_items as f64,
        )
    };

    InventorySummary {
        total_items,
        total_value,
        low_stock_items: items
            .iter()
            .filter(|i| i.quantity <= i.reorder_level)
            .count() as u64,
        out_of_stock_items: items.iter().filter(|i| i.quantity == 0).count() as u64,
        avg_price,
        avg_quantity,
    }
}

/// Per-category totals, highest total value first.
fn category_stats(items: &[inventory_item::Model]) -> Vec<CategoryStat> {
    let mut buckets: HashMap<&str, (u64, Decimal, Decimal)> = HashMap::new();
    for item in items {
        let entry = buckets
            .entry(item.category.as_str())
            .or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += item.total_value();
        entry.2 += item.unit_price;
    }

    let mut stats: Vec<CategoryStat> = buckets
        .into_iter()
        .map(|(category, (count, value, price_sum))| CategoryStat {
            category: category.to_string(),
            item_count: count,
            total_value: value,
            avg_price: price_sum / Decimal::from(count),
        })
        .collect();
    stats.sort_by(|a, b| {
        b.total_value
            .cmp(&a.total_value)
            .then_with(|| a.category.cmp(&b.category))
    });
    stats
}

/// Item count and stock value per supplier, highest value first.
/// Suppliers with no items are listed with zeroes.
fn supplier_performance(
    suppliers: &[supplier::Model],
    items: &[inventory_item::Model],
) -> Vec<SupplierPerformance> {
    let mut per_supplier: HashMap<Uuid, (u64, Decimal)> = HashMap::new();
    for item in items {
        let entry = per_supplier
            .entry(item.supplier_id)
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += item.total_value();
    }

    let mut performance: Vec<SupplierPerformance> = suppliers
        .iter()
        .map(|s| {
            let (item_count, total_value) =
                per_supplier.get(&s.id).copied().unwrap_or((0, Decimal::ZERO));
            SupplierPerformance {
                name: s.name.clone(),
                item_count,
                total_value,
            }
        })
        .collect();
    performance.sort_by(|a, b| {
        b.total_value
            .cmp(&a.total_value)
            .then_with(|| a.name.cmp(&b.name))
    });
    performance
}

/// Head count and active count per role, in declaration order.
/// Roles nobody holds are omitted.
fn users_by_role(users: &[user::Model]) -> Vec<RoleBreakdown> {
    let mut buckets: HashMap<UserRole, (u64, u64)> = HashMap::new();
    for u in users {
        let entry = buckets.entry(u.role).or_insert((0, 0));
        entry.0 += 1;
        if u.is_active {
            entry.1 += 1;
        }
    }

    UserRole::iter()
        .filter_map(|role| {
            buckets.get(&role).map(|&(count, active_count)| RoleBreakdown {
                role,
                count,
                active_count,
            })
        })
        .collect()
}

/// Created and resolved counts per alert type, in declaration order.
/// Types with no alerts in the period are omitted.
fn alert_breakdown(alerts: &[alert::Model]) -> Vec<AlertTypeBreakdown> {
    let mut buckets: HashMap<AlertType, (u64, u64)> = HashMap::new();
    for a in alerts {
        let entry = buckets.entry(a.alert_type).or_insert((0, 0));
        entry.0 += 1;
        if a.is_resolved {
            entry.1 += 1;
        }
    }

    AlertType::iter()
        .filter_map(|alert_type| {
            buckets.get(&alert_type).map(|&(count, resolved)| AlertTypeBreakdown {
                alert_type,
                count,
                resolved,
            })
        })
        .collect()
}

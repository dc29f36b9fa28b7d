use crate::{
    entities::{alert, inventory_item, supplier},
    errors::ServiceError,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month of stock movement for the six-month dashboard chart
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthTrend {
    pub month: String,
    pub quantity: i64,
    pub value: f64,
}

/// One day of stock movement for the seven-day dashboard chart
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayTrend {
    pub date: String,
    pub quantity: i64,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryStats {
    pub total_items: u64,
    pub low_stock_items: u64,
    pub total_value: f64,
    pub items_updated_today: u64,
    pub category_counts: BTreeMap<String, u64>,
    pub trends: Vec<MonthTrend>,
    pub week_trends: Vec<DayTrend>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopSupplier {
    pub name: String,
    pub item_count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierStats {
    pub total_suppliers: u64,
    pub top_suppliers: Vec<TopSupplier>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Kpis {
    /// Average inventory value per item, rounded to two decimals
    pub turnover: f64,
    /// Share of items above their reorder level, as a percentage
    pub accuracy: f64,
    pub active_alerts: u64,
    /// Alerts created in the last seven days minus the seven days before
    pub alerts_change: i64,
}

/// Everything the dashboard renders in one payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardAnalytics {
    pub inventory_stats: InventoryStats,
    pub supplier_stats: SupplierStats,
    pub kpis: Kpis,
}

/// Aggregates backing the downloadable export, shared by every output format
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub total_items: u64,
    pub low_stock_items: u64,
    pub total_value: Decimal,
    pub category_counts: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DatabaseConnection>,
}

impl AnalyticsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Computes the full dashboard payload.
    ///
    /// Inventory and supplier rows are loaded once and folded in memory;
    /// the alert counters stay as database counts. All five queries run
    /// concurrently.
    pub async fn get_dashboard(&self) -> Result<DashboardAnalytics, ServiceError> {
        let now = Utc::now();
        let week_start = now - Duration::days(6);
        let prev_week_start = week_start - Duration::days(7);

        let (items, suppliers, active_alerts, alerts_last_week, alerts_prev_week) = tokio::try_join!(
            inventory_item::Entity::find().all(&*self.db),
            supplier::Entity::find().all(&*self.db),
            alert::Entity::find()
                .filter(alert::Column::IsResolved.eq(false))
                .count(&*self.db),
            alert::Entity::find()
                .filter(alert::Column::CreatedAt.gte(week_start))
                .count(&*self.db),
            alert::Entity::find()
                .filter(alert::Column::CreatedAt.gte(prev_week_start))
                .filter(alert::Column::CreatedAt.lt(week_start))
                .count(&*self.db),
        )?;

        let inventory_stats = summarize_inventory(&items, now);

        let turnover = if inventory_stats.total_items == 0 {
            0.0
        } else {
            round2(inventory_stats.total_value / inventory_stats.total_items as f64)
        };
        let accuracy = if inventory_stats.total_items == 0 {
            0.0
        } else {
            let low = inventory_stats.low_stock_items as f64;
            round1(100.0 - low / inventory_stats.total_items as f64 * 100.0)
        };

        Ok(DashboardAnalytics {
            supplier_stats: SupplierStats {
                total_suppliers: suppliers.len() as u64,
                top_suppliers: rank_suppliers(&suppliers, &items),
            },
            kpis: Kpis {
                turnover,
                accuracy,
                active_alerts,
                alerts_change: alerts_change(alerts_last_week, alerts_prev_week),
            },
            inventory_stats,
        })
    }

    /// Computes the totals that feed the CSV, PDF and XLSX exports.
    pub async fn get_export_summary(&self) -> Result<ExportSummary, ServiceError> {
        let items = inventory_item::Entity::find().all(&*self.db).await?;

        let total_value: Decimal = items.iter().map(inventory_item::Model::total_value).sum();

        Ok(ExportSummary {
            total_items: items.len() as u64,
            low_stock_items: count_low_stock(&items),
            total_value: total_value.normalize(),
            category_counts: count_categories(&items),
        })
    }
}

fn summarize_inventory(items: &[inventory_item::Model], now: DateTime<Utc>) -> InventoryStats {
    let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let total_value: Decimal = items.iter().map(inventory_item::Model::total_value).sum();

    InventoryStats {
        total_items: items.len() as u64,
        low_stock_items: count_low_stock(items),
        total_value: decimal_to_f64(total_value),
        items_updated_today: items.iter().filter(|i| i.updated_at >= today_start).count() as u64,
        category_counts: count_categories(items),
        trends: month_trends(items, now),
        week_trends: week_trends(items, now),
    }
}

fn count_low_stock(items: &[inventory_item::Model]) -> u64 {
    items
        .iter()
        .filter(|i| i.quantity <= i.reorder_level)
        .count() as u64
}

fn count_categories(items: &[inventory_item::Model]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Six calendar months ending with the current one, oldest first.
/// Months without any updated items appear with zeroes so the chart
/// always has six points.
fn month_trends(items: &[inventory_item::Model], now: DateTime<Utc>) -> Vec<MonthTrend> {
    let mut buckets: HashMap<(i32, u32), (i64, Decimal)> = HashMap::new();
    for item in items {
        let key = (item.updated_at.year(), item.updated_at.month());
        let entry = buckets.entry(key).or_insert((0, Decimal::ZERO));
        entry.0 += i64::from(item.quantity);
        entry.1 += item.total_value();
    }

    (0..6)
        .rev()
        .map(|back| {
            let (year, month) = month_key(now, back);
            let (quantity, value) = buckets
                .get(&(year, month))
                .copied()
                .unwrap_or((0, Decimal::ZERO));
            MonthTrend {
                month: MONTH_LABELS[(month - 1) as usize].to_string(),
                quantity,
                value: decimal_to_f64(value),
            }
        })
        .collect()
}

/// Seven days ending today, oldest first, keyed by UTC calendar date.
fn week_trends(items: &[inventory_item::Model], now: DateTime<Utc>) -> Vec<DayTrend> {
    let mut buckets: HashMap<NaiveDate, (i64, Decimal)> = HashMap::new();
    for item in items {
        let entry = buckets
            .entry(item.updated_at.date_naive())
            .or_insert((0, Decimal::ZERO));
        entry.0 += i64::from(item.quantity);
        entry.1 += item.total_value();
    }

    (0..7)
        .rev()
        .map(|back| {
            let day = (now - Duration::days(back)).date_naive();
            let (quantity, value) = buckets.get(&day).copied().unwrap_or((0, Decimal::ZERO));
            DayTrend {
                date: day.format("%Y-%m-%d").to_string(),
                quantity,
                value: decimal_to_f64(value),
            }
        })
        .collect()
}

/// Top five suppliers by how many inventory items reference them.
/// Suppliers without items still compete, with a count of zero.
fn rank_suppliers(
    suppliers: &[supplier::Model],
    items: &[inventory_item::Model],
) -> Vec<TopSupplier> {
    let mut per_supplier: HashMap<Uuid, u64> = HashMap::new();
    for item in items {
        *per_supplier.entry(item.supplier_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<TopSupplier> = suppliers
        .iter()
        .map(|s| TopSupplier {
            name: s.name.clone(),
            item_count: per_supplier.get(&s.id).copied().unwrap_or(0),
        })
        .collect();
    ranked.sort_by(|a, b| b.item_count.cmp(&a.item_count));
    ranked.truncate(5);
    ranked
}

/// Week-over-week delta of created alerts. With no alerts in the prior
/// week the current count is reported as-is rather than an infinite jump.
fn alerts_change(last_week: u64, prev_week: u64) -> i64 {
    if prev_week == 0 {
        last_week as i64
    } else {
        last_week as i64 - prev_week as i64
    }
}

/// Calendar month `back` months before `now`, as (year, one-based month).
fn month_key(now: DateTime<Utc>, back: u32) -> (i32, u32) {
    let total = now.year() * 12 + now.month0() as i32 - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

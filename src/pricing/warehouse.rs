use serde::Serialize;

use crate::pricing::models::{WarehouseRecord, WarehouseType};
use crate::pricing::tables::PriceTable;

/// Priced view of one warehouse schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseCost {
    pub name: String,
    pub warehouse_type: WarehouseType,
    pub size: String,
    pub dbus_per_hour: u32,
    pub hourly_rate: f64,
    pub hours_per_day: u32,
    pub days_per_month: u32,
    pub monthly_cost: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseBreakdown {
    pub warehouses: Vec<WarehouseCost>,
    pub total: f64,
}

impl WarehouseBreakdown {
    pub fn active_count(&self) -> usize {
        self.warehouses.iter().filter(|w| w.active).count()
    }
}

/// hourly rate × hours per day × days per month
pub fn warehouse_monthly_cost(record: &WarehouseRecord, prices: &PriceTable) -> f64 {
    let (hourly_rate, _) = prices.warehouse_rate_or_zero(&record.size);
    hourly_rate * record.hours_per_day as f64 * record.days_per_month as f64
}

fn price_warehouse(record: &WarehouseRecord, prices: &PriceTable) -> WarehouseCost {
    let (hourly_rate, dbus_per_hour) = prices.warehouse_rate_or_zero(&record.size);
    let active = record.is_active();
    let monthly_cost = if active {
        hourly_rate * record.hours_per_day as f64 * record.days_per_month as f64
    } else {
        0.0
    };

    WarehouseCost {
        name: record.name.clone(),
        warehouse_type: record.warehouse_type,
        size: record.size.clone(),
        dbus_per_hour,
        hourly_rate,
        hours_per_day: record.hours_per_day,
        days_per_month: record.days_per_month,
        monthly_cost,
        active,
    }
}

/// Price all warehouses; paused ones (zero hours or days) add nothing
pub fn calculate_warehouses(records: &[WarehouseRecord], prices: &PriceTable) -> WarehouseBreakdown {
    let warehouses: Vec<WarehouseCost> =
        records.iter().map(|r| price_warehouse(r, prices)).collect();
    let total = warehouses
        .iter()
        .filter(|w| w.active)
        .map(|w| w.monthly_cost)
        .sum();

    WarehouseBreakdown { warehouses, total }
}

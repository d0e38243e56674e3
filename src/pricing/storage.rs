use serde::Serialize;

use crate::pricing::models::{DirectZone, StorageConfig, StorageMode, StorageUnit, TableEntry, TableZone};
use crate::pricing::projection::project_twelve_months;
use crate::pricing::tables::{
    PriceTable, GB_PER_TB, KB_PER_GB, KB_PER_RECORD_PER_COLUMN, STANDARD_STORAGE_CLASS,
};

/// Current and projected cost of one zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCost {
    pub zone: String,
    pub capacity_gb: f64,
    pub current_cost: f64,
    /// Sum over the next twelve months
    pub projected_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageBreakdown {
    pub mode: StorageMode,
    pub zones: Vec<ZoneCost>,
    pub current_total: f64,
    pub projected_total: f64,
}

impl StorageBreakdown {
    pub fn zone(&self, name: &str) -> Option<&ZoneCost> {
        self.zones.iter().find(|z| z.zone == name)
    }
}

/// Entered capacity normalized to GB
pub fn capacity_gb(amount: f64, unit: StorageUnit) -> f64 {
    match unit {
        StorageUnit::TB => amount * GB_PER_TB,
        StorageUnit::GB => amount,
    }
}

/// Estimated footprint of one table in GB
pub fn estimated_table_gb(entry: &TableEntry) -> f64 {
    entry.records * entry.columns as f64 * KB_PER_RECORD_PER_COLUMN / KB_PER_GB
}

fn direct_zone_cost(zone: &DirectZone, prices: &PriceTable) -> ZoneCost {
    let capacity = capacity_gb(zone.amount, zone.unit);
    let current_cost = capacity * prices.storage_rate_or_zero(&zone.storage_class);

    ZoneCost {
        zone: zone.zone.clone(),
        capacity_gb: capacity,
        current_cost,
        projected_cost: project_twelve_months(current_cost, zone.monthly_growth_percent),
    }
}

fn table_zone_cost(zone: &TableZone, prices: &PriceTable) -> ZoneCost {
    let capacity: f64 = zone.entries.iter().map(estimated_table_gb).sum();
    // table estimates are always priced as Standard storage
    let current_cost = capacity * prices.storage_rate_or_zero(STANDARD_STORAGE_CLASS);

    ZoneCost {
        zone: zone.zone.clone(),
        capacity_gb: capacity,
        current_cost,
        projected_cost: project_twelve_months(current_cost, zone.monthly_growth_percent),
    }
}

/// Price the zones of the active storage mode
pub fn calculate_storage(storage: &StorageConfig, prices: &PriceTable) -> StorageBreakdown {
    let zones: Vec<ZoneCost> = match storage.mode {
        StorageMode::Direct => storage
            .direct
            .iter()
            .map(|zone| direct_zone_cost(zone, prices))
            .collect(),
        StorageMode::Table => storage
            .tables
            .iter()
            .map(|zone| table_zone_cost(zone, prices))
            .collect(),
    };

    let current_total = zones.iter().map(|z| z.current_cost).sum();
    let projected_total = zones.iter().map(|z| z.projected_cost).sum();

    StorageBreakdown {
        mode: storage.mode,
        zones,
        current_total,
        projected_total,
    }
}

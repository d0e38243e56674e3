use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::pricing::compute::{calculate_all_tiers, TierBreakdown};
use crate::pricing::models::{Estimate, Tier};
use crate::pricing::projection::{project_twelve_months, PROJECTION_MONTHS};
use crate::pricing::storage::{calculate_storage, StorageBreakdown};
use crate::pricing::tables::PriceTable;
use crate::pricing::warehouse::{calculate_warehouses, WarehouseBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CostCategory {
    Compute,
    Storage,
    Warehouse,
}

impl CostCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Compute => "Databricks & Compute",
            CostCategory::Storage => "S3 Storage",
            CostCategory::Warehouse => "SQL Warehouse",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One slice of the cost distribution chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub category: CostCategory,
    pub amount: f64,
    /// Fraction of the grand total, 0.0..=1.0
    pub share: f64,
}

/// Twelve-month outlook per category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub compute: f64,
    pub storage: f64,
    pub warehouse: f64,
    pub total: f64,
}

/// Everything derived from an estimate in one recomputation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub tiers: Vec<TierBreakdown>,
    pub storage: StorageBreakdown,
    pub warehouses: WarehouseBreakdown,
    pub job_count: usize,
    /// DBU spend across tiers
    pub dbu_total: f64,
    /// EC2 spend across tiers
    pub ec2_total: f64,
    pub databricks_total: f64,
    pub storage_total: f64,
    pub warehouse_total: f64,
    pub grand_total: f64,
    pub projection: ProjectionSummary,
}

impl CostSummary {
    pub fn category_total(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Compute => self.databricks_total,
            CostCategory::Storage => self.storage_total,
            CostCategory::Warehouse => self.warehouse_total,
        }
    }

    /// Category subtotals that are strictly positive; empty when nothing costs anything
    pub fn distribution(&self) -> Vec<DistributionSlice> {
        [
            CostCategory::Compute,
            CostCategory::Storage,
            CostCategory::Warehouse,
        ]
        .into_iter()
        .map(|category| (category, self.category_total(category)))
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(category, amount)| DistributionSlice {
            category,
            amount,
            share: amount / self.grand_total,
        })
        .collect()
    }

    pub fn tier(&self, tier: Tier) -> Option<&TierBreakdown> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}

/// Run every calculator over the estimate and aggregate the results
pub fn summarize(estimate: &Estimate, prices: &PriceTable) -> CostSummary {
    let tiers = calculate_all_tiers(&estimate.jobs, prices);
    let storage = calculate_storage(&estimate.storage, prices);
    let warehouses = calculate_warehouses(&estimate.warehouses, prices);

    let dbu_total: f64 = tiers.iter().map(|t| t.compute_cost).sum();
    let ec2_total: f64 = tiers.iter().map(|t| t.infra_cost).sum();
    let databricks_total: f64 = tiers.iter().map(|t| t.compute_cost + t.infra_cost).sum();
    let storage_total = storage.current_total;
    let warehouse_total = warehouses.total;
    let grand_total = databricks_total + storage_total + warehouse_total;

    let projected_compute =
        project_twelve_months(databricks_total, estimate.compute_growth_percent);
    let projected_warehouse = warehouse_total * PROJECTION_MONTHS as f64;
    let projection = ProjectionSummary {
        compute: projected_compute,
        storage: storage.projected_total,
        warehouse: projected_warehouse,
        total: projected_compute + storage.projected_total + projected_warehouse,
    };

    debug!(
        grand_total,
        databricks_total, storage_total, warehouse_total, "Recomputed cost summary"
    );

    CostSummary {
        job_count: estimate.jobs.len(),
        tiers,
        storage,
        warehouses,
        dbu_total,
        ec2_total,
        databricks_total,
        storage_total,
        warehouse_total,
        grand_total,
        projection,
    }
}

pub mod compute;
pub mod models;
pub mod projection;
pub mod storage;
pub mod summary;
pub mod tables;
pub mod warehouse;

pub use compute::{calculate_all_tiers, calculate_tier, price_job, JobCost, TierBreakdown, JOB_TABLE_COLUMNS};
pub use models::{
    DirectZone, Estimate, JobRecord, StorageConfig, StorageMode, StorageUnit, TableEntry,
    TableZone, Tier, TierJobs, WarehouseRecord, WarehouseType,
};
pub use projection::{project_twelve_months, project_with_factor};
pub use storage::{calculate_storage, StorageBreakdown, ZoneCost};
pub use summary::{summarize, CostCategory, CostSummary, DistributionSlice, ProjectionSummary};
pub use tables::{instance_label, warehouse_size_label, PriceTable};
pub use warehouse::{calculate_warehouses, WarehouseBreakdown, WarehouseCost};

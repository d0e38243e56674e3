use serde::Serialize;

use crate::pricing::models::{JobRecord, Tier, TierJobs};
use crate::pricing::tables::{PriceTable, PHOTON_PREMIUM_MULTIPLIER, SPOT_DISCOUNT_MULTIPLIER};

/// Columns of an augmented job table, present even when it has no rows
pub const JOB_TABLE_COLUMNS: [&str; 12] = [
    "#",
    "Job Name",
    "Runtime (hrs)",
    "Runs/Month",
    "Instance Type",
    "Nodes",
    "Photon",
    "Spot",
    "DBU Units",
    "DBU Cost",
    "EC2 Cost",
    "Total Cost",
];

/// A job record with its derived cost columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCost {
    pub job: JobRecord,
    /// runtime hours × runs per month × nodes
    pub units: f64,
    /// DBU spend
    pub compute_cost: f64,
    /// EC2 spend
    pub infra_cost: f64,
    pub total_cost: f64,
}

/// Augmented job table and totals for one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierBreakdown {
    pub tier: Tier,
    pub jobs: Vec<JobCost>,
    pub compute_cost: f64,
    pub infra_cost: f64,
}

impl TierBreakdown {
    pub fn columns(&self) -> &'static [&'static str] {
        &JOB_TABLE_COLUMNS
    }

    pub fn total(&self) -> f64 {
        self.compute_cost + self.infra_cost
    }
}

/// Price a single job on a tier
pub fn price_job(job: &JobRecord, tier: Tier, prices: &PriceTable) -> JobCost {
    let units = job.runtime_hours * job.runs_per_month as f64 * job.nodes as f64;

    let photon = if job.photon { PHOTON_PREMIUM_MULTIPLIER } else { 1.0 };
    let compute_cost = units * prices.dbu_rate(tier) * photon;

    let spot = if job.spot { SPOT_DISCOUNT_MULTIPLIER } else { 1.0 };
    let infra_rate = prices.instance_rate_or_zero(&job.instance_type) * spot;
    let infra_cost =
        job.runtime_hours * job.runs_per_month as f64 * job.nodes as f64 * infra_rate;

    JobCost {
        job: job.clone(),
        units,
        compute_cost,
        infra_cost,
        total_cost: compute_cost + infra_cost,
    }
}

/// Price every job of a tier and total the DBU and EC2 columns
pub fn calculate_tier(jobs: &[JobRecord], tier: Tier, prices: &PriceTable) -> TierBreakdown {
    let jobs: Vec<JobCost> = jobs.iter().map(|job| price_job(job, tier, prices)).collect();

    let compute_cost = jobs.iter().map(|j| j.compute_cost).sum();
    let infra_cost = jobs.iter().map(|j| j.infra_cost).sum();

    TierBreakdown {
        tier,
        jobs,
        compute_cost,
        infra_cost,
    }
}

/// One breakdown per tier, Bronze first
pub fn calculate_all_tiers(jobs: &TierJobs, prices: &PriceTable) -> Vec<TierBreakdown> {
    jobs.iter()
        .map(|(tier, records)| calculate_tier(records, tier, prices))
        .collect()
}

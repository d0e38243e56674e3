//! Editable in-memory session
//!
//! The session owns the estimate and applies grid edits to it. Nothing is
//! cached: every call to [`Session::summary`] runs all calculators again.

use tracing::debug;

use crate::error::CostError;
use crate::export::{build_report, Report};
use crate::pricing::models::{
    DirectZone, Estimate, JobRecord, StorageMode, TableEntry, Tier, WarehouseRecord,
    MAX_JOBS_PER_TIER,
};
use crate::pricing::summary::{summarize, CostSummary};
use crate::pricing::tables::PriceTable;

pub struct Session {
    estimate: Estimate,
    prices: &'static PriceTable,
}

impl Session {
    pub fn new(estimate: Estimate) -> Self {
        Self {
            estimate,
            prices: PriceTable::standard(),
        }
    }

    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    pub fn into_estimate(self) -> Estimate {
        self.estimate
    }

    /// Recompute every calculator from the current records
    pub fn summary(&self) -> CostSummary {
        summarize(&self.estimate, self.prices)
    }

    /// Recompute and build the export document
    pub fn report(&self) -> Report {
        let summary = self.summary();
        build_report(
            &summary.tiers,
            &self.estimate.storage,
            &self.estimate.warehouses,
            self.prices,
        )
    }

    // Jobs

    /// Grow with default rows or truncate from the end
    pub fn resize_jobs(&mut self, tier: Tier, count: usize) -> Result<(), CostError> {
        if count > MAX_JOBS_PER_TIER {
            return Err(CostError::SessionError(format!(
                "{} allows at most {} jobs, requested {}",
                tier, MAX_JOBS_PER_TIER, count
            )));
        }

        let jobs = self.estimate.jobs.get_mut(tier);
        if count < jobs.len() {
            jobs.truncate(count);
        } else {
            while jobs.len() < count {
                jobs.push(JobRecord::new_row(0));
            }
        }
        renumber(jobs);

        debug!(%tier, count, "Resized job table");
        Ok(())
    }

    pub fn add_job(&mut self, tier: Tier) -> Result<usize, CostError> {
        let len = self.estimate.jobs.get(tier).len();
        self.resize_jobs(tier, len + 1)?;
        Ok(len)
    }

    pub fn remove_job(&mut self, tier: Tier, index: usize) -> Result<JobRecord, CostError> {
        let jobs = self.estimate.jobs.get_mut(tier);
        check_index(index, jobs.len(), "job")?;
        let removed = jobs.remove(index);
        renumber(jobs);
        Ok(removed)
    }

    /// Replace a job row; the sequence number stays positional
    pub fn update_job(&mut self, tier: Tier, index: usize, job: JobRecord) -> Result<(), CostError> {
        let jobs = self.estimate.jobs.get_mut(tier);
        check_index(index, jobs.len(), "job")?;
        jobs[index] = job;
        renumber(jobs);
        Ok(())
    }

    // Storage

    pub fn set_storage_mode(&mut self, mode: StorageMode) {
        self.estimate.storage.mode = mode;
    }

    /// Replace the direct-mode zone with the same name, or append it
    pub fn set_direct_zone(&mut self, zone: DirectZone) {
        let zones = &mut self.estimate.storage.direct;
        match zones.iter_mut().find(|z| z.zone == zone.zone) {
            Some(existing) => *existing = zone,
            None => zones.push(zone),
        }
    }

    /// Replace a table-mode zone's entries, dropping blank rows
    pub fn set_zone_tables(&mut self, zone: &str, entries: Vec<TableEntry>) -> Result<(), CostError> {
        let target = self
            .estimate
            .storage
            .tables
            .iter_mut()
            .find(|z| z.zone == zone)
            .ok_or_else(|| CostError::SessionError(format!("Unknown storage zone: {}", zone)))?;

        let before = entries.len();
        target.entries = entries.into_iter().filter(|e| !e.is_blank()).collect();
        if target.entries.len() < before {
            debug!(zone, dropped = before - target.entries.len(), "Dropped blank table rows");
        }
        Ok(())
    }

    // Warehouses

    pub fn add_warehouse(&mut self) -> usize {
        self.estimate
            .warehouses
            .push(WarehouseRecord::named("New Warehouse"));
        self.estimate.warehouses.len() - 1
    }

    pub fn remove_warehouse(&mut self, index: usize) -> Result<WarehouseRecord, CostError> {
        check_index(index, self.estimate.warehouses.len(), "warehouse")?;
        Ok(self.estimate.warehouses.remove(index))
    }

    pub fn update_warehouse(&mut self, index: usize, record: WarehouseRecord) -> Result<(), CostError> {
        check_index(index, self.estimate.warehouses.len(), "warehouse")?;
        self.estimate.warehouses[index] = record;
        Ok(())
    }

    pub fn set_compute_growth_percent(&mut self, percent: f64) -> Result<(), CostError> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(CostError::SessionError(format!(
                "Growth percent must be a non-negative number, got {}",
                percent
            )));
        }
        self.estimate.compute_growth_percent = percent;
        Ok(())
    }
}

fn renumber(jobs: &mut [JobRecord]) {
    for (idx, job) in jobs.iter_mut().enumerate() {
        job.seq = idx as u32 + 1;
    }
}

fn check_index(index: usize, len: usize, what: &str) -> Result<(), CostError> {
    if index >= len {
        return Err(CostError::SessionError(format!(
            "{} index {} out of range (have {})",
            what, index, len
        )));
    }
    Ok(())
}

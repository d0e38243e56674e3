//! Spreadsheet report
//!
//! The report is built as a plain document model first (sheets of header and
//! typed cells) and rendered to `.xlsx` separately, so its shape can be
//! checked without opening a workbook.

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::CostError;
use crate::pricing::compute::TierBreakdown;
use crate::pricing::models::{StorageConfig, StorageMode, WarehouseRecord};
use crate::pricing::tables::{instance_label, PriceTable};
use crate::pricing::warehouse::warehouse_monthly_cost;

pub const REPORT_FILENAME: &str = "cloud_cost_report.xlsx";
pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const JOBS_SHEET: &str = "Databricks_Jobs";
pub const DIRECT_STORAGE_SHEET: &str = "S3_Direct_Storage";
pub const TABLE_STORAGE_SHEET: &str = "S3_Table_Based_Storage";
pub const WAREHOUSES_SHEET: &str = "SQL_Warehouses";

pub const JOB_HEADERS: [&str; 12] = [
    "Tier",
    "Job No",
    "Name",
    "Runtime Hours",
    "Runs per Month",
    "Instance",
    "Nodes",
    "Photon Enabled",
    "Spot Instance",
    "Calculated DBU Units",
    "Calculated DBU Cost ($)",
    "Calculated EC2 Cost ($)",
];

pub const DIRECT_STORAGE_HEADERS: [&str; 5] =
    ["Zone", "Storage Class", "Storage Amount", "Unit", "Monthly Growth %"];

pub const TABLE_STORAGE_HEADERS: [&str; 4] = ["Zone", "Table Name", "Records", "Columns"];

pub const WAREHOUSE_HEADERS: [&str; 8] = [
    "Name",
    "Type",
    "Size",
    "DBUs per Hour",
    "Hourly Rate ($)",
    "Hours per Day",
    "Days per Month",
    "Monthly Cost ($)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    fn new(name: &'static str, headers: &[&'static str]) -> Self {
        Self {
            name,
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Value of `header` in data row `row`
    pub fn cell(&self, row: usize, header: &str) -> Option<&CellValue> {
        let col = self.headers.iter().position(|h| *h == header)?;
        self.rows.get(row)?.get(col)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Render the workbook to bytes
    pub fn to_xlsx(&self) -> Result<Vec<u8>, CostError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name)?;

            for (col, title) in sheet.headers.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
            }

            for (idx, row) in sheet.rows.iter().enumerate() {
                let row_num = idx as u32 + 1;
                for (col, cell) in row.iter().enumerate() {
                    let col = col as u16;
                    match cell {
                        CellValue::Text(text) => worksheet.write_string(row_num, col, text)?,
                        CellValue::Number(number) => worksheet.write_number(row_num, col, *number)?,
                        CellValue::Bool(flag) => worksheet.write_boolean(row_num, col, *flag)?,
                    };
                }
            }

            worksheet.autofit();
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Render and write the workbook to `path`
    pub fn write_to(&self, path: &Path) -> Result<(), CostError> {
        let bytes = self.to_xlsx()?;
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote cost report");
        Ok(())
    }
}

/// Assemble the three report sheets
///
/// The derived total-cost column of the job tables is not exported.
pub fn build_report(
    tiers: &[TierBreakdown],
    storage: &StorageConfig,
    warehouses: &[WarehouseRecord],
    prices: &PriceTable,
) -> Report {
    Report {
        sheets: vec![
            jobs_sheet(tiers),
            storage_sheet(storage),
            warehouses_sheet(warehouses, prices),
        ],
    }
}

fn jobs_sheet(tiers: &[TierBreakdown]) -> Sheet {
    let mut sheet = Sheet::new(JOBS_SHEET, &JOB_HEADERS);

    for tier in tiers {
        for cost in &tier.jobs {
            let job = &cost.job;
            sheet.rows.push(vec![
                tier.tier.label().into(),
                job.seq.into(),
                job.name.clone().into(),
                job.runtime_hours.into(),
                job.runs_per_month.into(),
                instance_label(&job.instance_type).into(),
                job.nodes.into(),
                job.photon.into(),
                job.spot.into(),
                cost.units.into(),
                cost.compute_cost.into(),
                cost.infra_cost.into(),
            ]);
        }
    }

    sheet
}

fn storage_sheet(storage: &StorageConfig) -> Sheet {
    match storage.mode {
        StorageMode::Direct => {
            let mut sheet = Sheet::new(DIRECT_STORAGE_SHEET, &DIRECT_STORAGE_HEADERS);
            for zone in &storage.direct {
                sheet.rows.push(vec![
                    zone.zone.clone().into(),
                    zone.storage_class.clone().into(),
                    zone.amount.into(),
                    zone.unit.to_string().into(),
                    zone.monthly_growth_percent.into(),
                ]);
            }
            sheet
        }
        StorageMode::Table => {
            let mut sheet = Sheet::new(TABLE_STORAGE_SHEET, &TABLE_STORAGE_HEADERS);
            for zone in &storage.tables {
                for entry in &zone.entries {
                    sheet.rows.push(vec![
                        zone.zone.clone().into(),
                        entry.table_name.clone().into(),
                        entry.records.into(),
                        entry.columns.into(),
                    ]);
                }
            }
            sheet
        }
    }
}

fn warehouses_sheet(warehouses: &[WarehouseRecord], prices: &PriceTable) -> Sheet {
    let mut sheet = Sheet::new(WAREHOUSES_SHEET, &WAREHOUSE_HEADERS);

    for record in warehouses {
        let (hourly_rate, dbus_per_hour) = prices.warehouse_rate_or_zero(&record.size);
        sheet.rows.push(vec![
            record.name.clone().into(),
            record.warehouse_type.as_str().into(),
            record.size.clone().into(),
            dbus_per_hour.into(),
            hourly_rate.into(),
            record.hours_per_day.into(),
            record.days_per_month.into(),
            warehouse_monthly_cost(record, prices).into(),
        ]);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::compute::calculate_all_tiers;
    use crate::pricing::models::{Estimate, TableEntry, TableZone, Tier, TierJobs};

    fn report_for(estimate: &Estimate) -> Report {
        let prices = PriceTable::standard();
        let tiers = calculate_all_tiers(&estimate.jobs, prices);
        build_report(&tiers, &estimate.storage, &estimate.warehouses, prices)
    }

    #[test]
    fn test_empty_configuration_has_header_only_sheets() {
        let report = report_for(&Estimate::empty());

        assert_eq!(report.sheets.len(), 3);
        let names: Vec<&str> = report.sheets.iter().map(|s| s.name).collect();
        assert_eq!(names, vec![JOBS_SHEET, DIRECT_STORAGE_SHEET, WAREHOUSES_SHEET]);
        for sheet in &report.sheets {
            assert!(!sheet.headers.is_empty());
            assert!(sheet.rows.is_empty());
        }

        let bytes = report.to_xlsx().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_jobs_sheet_is_tier_tagged_without_total_column() {
        let estimate = Estimate::default();
        let report = report_for(&estimate);
        let jobs = report.sheet(JOBS_SHEET).unwrap();

        assert_eq!(jobs.rows.len(), 3);
        assert!(!jobs.headers.contains(&"Total Cost"));
        assert_eq!(jobs.headers.len(), 12);
        assert_eq!(jobs.cell(0, "Tier"), Some(&CellValue::from("L0 / Bronze")));
        assert_eq!(jobs.cell(2, "Name"), Some(&CellValue::from("Gold Job 1")));
        assert_eq!(
            jobs.cell(1, "Instance"),
            Some(&CellValue::from("m5.large (General Purpose)"))
        );
        assert!(jobs.rows.iter().all(|row| row.len() == jobs.headers.len()));
    }

    #[test]
    fn test_table_mode_storage_sheet() {
        let mut estimate = Estimate::empty();
        estimate.storage.mode = StorageMode::Table;
        estimate.storage.tables = vec![
            TableZone {
                zone: "Landing Zone".to_string(),
                entries: vec![TableEntry::new("raw", 10, 3), TableEntry::new("raw2", 20, 4)],
                monthly_growth_percent: 0.0,
            },
            TableZone {
                zone: "L2 / Gold".to_string(),
                entries: vec![],
                monthly_growth_percent: 0.0,
            },
        ];

        let report = report_for(&estimate);
        let sheet = report.sheet(TABLE_STORAGE_SHEET).unwrap();

        assert!(report.sheet(DIRECT_STORAGE_SHEET).is_none());
        assert_eq!(sheet.headers, TABLE_STORAGE_HEADERS.to_vec());
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.cell(1, "Records"), Some(&CellValue::Number(20.0)));
    }

    #[test]
    fn test_warehouse_sheet_recomputes_monthly_cost() {
        let mut estimate = Estimate::default();
        estimate.warehouses[0].size = "Small".to_string();
        estimate.jobs = TierJobs::default();

        let report = report_for(&estimate);
        let sheet = report.sheet(WAREHOUSES_SHEET).unwrap();

        assert_eq!(sheet.cell(0, "DBUs per Hour"), Some(&CellValue::Number(4.0)));
        match sheet.cell(0, "Monthly Cost ($)") {
            Some(CellValue::Number(cost)) => assert!((cost - 0.88 * 8.0 * 22.0).abs() < 1e-9),
            other => panic!("unexpected cell {:?}", other),
        }
        assert!(report.sheet(JOBS_SHEET).unwrap().rows.is_empty());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILENAME);

        let mut estimate = Estimate::default();
        estimate.jobs.get_mut(Tier::Silver)[0].runtime_hours = 1.0;
        report_for(&estimate).write_to(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }
}

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pricing::tables::{DEFAULT_INSTANCE_TYPE, DEFAULT_WAREHOUSE_SIZE};

/// Current configuration layout version
pub const CURRENT_VERSION: u32 = 2;

/// Editor limit on jobs per tier
pub const MAX_JOBS_PER_TIER: usize = 20;

/// Service level of a job; each tier has its own DBU rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Bronze, Tier::Silver, Tier::Gold];

    /// Display label, e.g. "L1 / Silver"
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Bronze => "L0 / Bronze",
            Tier::Silver => "L1 / Silver",
            Tier::Gold => "L2 / Gold",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled job running on a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// 1-based position within its tier, maintained by the session
    #[serde(default)]
    pub seq: u32,
    pub name: String,
    #[serde(default)]
    pub runtime_hours: f64,
    #[serde(default)]
    pub runs_per_month: u32,
    #[serde(default = "default_instance_type")]
    pub instance_type: String,
    #[serde(default = "default_nodes")]
    pub nodes: u32,
    #[serde(default)]
    pub photon: bool,
    #[serde(default)]
    pub spot: bool,
}

impl JobRecord {
    /// Row appended by the editor's "add row"
    pub fn new_row(seq: u32) -> Self {
        Self::named(seq, "New Job")
    }

    pub fn named(seq: u32, name: impl Into<String>) -> Self {
        Self {
            seq,
            name: name.into(),
            runtime_hours: 0.0,
            runs_per_month: 0,
            instance_type: default_instance_type(),
            nodes: default_nodes(),
            photon: false,
            spot: false,
        }
    }
}

fn default_instance_type() -> String {
    DEFAULT_INSTANCE_TYPE.to_string()
}

fn default_nodes() -> u32 {
    1
}

/// Jobs grouped by tier, always in Bronze, Silver, Gold order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierJobs {
    #[serde(default)]
    pub bronze: Vec<JobRecord>,
    #[serde(default)]
    pub silver: Vec<JobRecord>,
    #[serde(default)]
    pub gold: Vec<JobRecord>,
}

impl TierJobs {
    pub fn get(&self, tier: Tier) -> &[JobRecord] {
        match tier {
            Tier::Bronze => &self.bronze,
            Tier::Silver => &self.silver,
            Tier::Gold => &self.gold,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut Vec<JobRecord> {
        match tier {
            Tier::Bronze => &mut self.bronze,
            Tier::Silver => &mut self.silver,
            Tier::Gold => &mut self.gold,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[JobRecord])> {
        Tier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }

    pub fn len(&self) -> usize {
        self.bronze.len() + self.silver.len() + self.gold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which storage calculation is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Direct,
    Table,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageUnit {
    #[default]
    GB,
    TB,
}

impl fmt::Display for StorageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageUnit::GB => f.write_str("GB"),
            StorageUnit::TB => f.write_str("TB"),
        }
    }
}

/// Zone priced from an entered capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectZone {
    pub zone: String,
    pub storage_class: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: StorageUnit,
    #[serde(default)]
    pub monthly_growth_percent: f64,
}

impl DirectZone {
    pub fn new(zone: impl Into<String>, storage_class: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            storage_class: storage_class.into(),
            amount: 0.0,
            unit: StorageUnit::GB,
            monthly_growth_percent: 0.0,
        }
    }
}

/// One table inside a table-mode zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    #[serde(default)]
    pub table_name: String,
    /// Kept fractional; grid cells may hold values such as "1500.5"
    #[serde(default, deserialize_with = "loose_f64")]
    pub records: f64,
    #[serde(default, deserialize_with = "loose_u32")]
    pub columns: u32,
}

impl TableEntry {
    pub fn new(table_name: impl Into<String>, records: impl Into<f64>, columns: u32) -> Self {
        Self {
            table_name: table_name.into(),
            records: records.into(),
            columns,
        }
    }

    /// Rows the table editor leaves behind when a user clears a line
    pub fn is_blank(&self) -> bool {
        self.table_name.trim().is_empty() && self.records == 0.0 && self.columns == 0
    }
}

/// Zone priced from an estimated capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableZone {
    pub zone: String,
    #[serde(default, deserialize_with = "entries_skipping_malformed")]
    pub entries: Vec<TableEntry>,
    #[serde(default)]
    pub monthly_growth_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub mode: StorageMode,
    #[serde(default)]
    pub direct: Vec<DirectZone>,
    #[serde(default)]
    pub tables: Vec<TableZone>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WarehouseType {
    #[default]
    Classic,
    Pro,
    Serverless,
}

impl WarehouseType {
    pub const ALL: [WarehouseType; 3] = [
        WarehouseType::Classic,
        WarehouseType::Pro,
        WarehouseType::Serverless,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseType::Classic => "Classic",
            WarehouseType::Pro => "Pro",
            WarehouseType::Serverless => "Serverless",
        }
    }
}

// Retired type names from older sessions fall back to Classic.
impl From<String> for WarehouseType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pro" => WarehouseType::Pro,
            "serverless" => WarehouseType::Serverless,
            _ => WarehouseType::Classic,
        }
    }
}

impl From<WarehouseType> for String {
    fn from(value: WarehouseType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL warehouse schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub warehouse_type: WarehouseType,
    /// Size key such as "Small"; see `tables::warehouse_size_label` for display
    #[serde(default = "default_warehouse_size")]
    pub size: String,
    #[serde(default)]
    pub hours_per_day: u32,
    #[serde(default)]
    pub days_per_month: u32,
    #[serde(default = "default_auto_suspend")]
    pub auto_suspend: bool,
    #[serde(default = "default_suspend_after")]
    pub suspend_after_minutes: u32,
}

impl WarehouseRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            warehouse_type: WarehouseType::Classic,
            size: default_warehouse_size(),
            hours_per_day: 8,
            days_per_month: 22,
            auto_suspend: default_auto_suspend(),
            suspend_after_minutes: default_suspend_after(),
        }
    }

    /// Zero hours or zero days is how a paused warehouse is represented
    pub fn is_active(&self) -> bool {
        self.hours_per_day > 0 && self.days_per_month > 0
    }
}

fn default_warehouse_size() -> String {
    DEFAULT_WAREHOUSE_SIZE.to_string()
}

fn default_auto_suspend() -> bool {
    true
}

fn default_suspend_after() -> u32 {
    10
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Monthly growth applied to compute spend in the 12-month projection
    #[serde(default)]
    pub compute_growth_percent: f64,
    #[serde(default)]
    pub jobs: TierJobs,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub warehouses: Vec<WarehouseRecord>,
}

impl Estimate {
    /// Configuration with no jobs, zones, or warehouses
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            compute_growth_percent: 0.0,
            jobs: TierJobs::default(),
            storage: StorageConfig::default(),
            warehouses: Vec::new(),
        }
    }
}

impl Default for Estimate {
    /// The starter session: one job per tier, four lake zones, one warehouse
    fn default() -> Self {
        let mut jobs = TierJobs::default();
        for tier in Tier::ALL {
            jobs.get_mut(tier)
                .push(JobRecord::named(1, format!("{} Job 1", tier.short_name())));
        }

        let direct = vec![
            DirectZone::new("Landing Zone", "Standard"),
            DirectZone::new("L0 / Bronze", "Standard"),
            DirectZone::new("L1 / Silver", "Infrequent Access"),
            DirectZone::new("L2 / Gold", "Standard"),
        ];

        let tables = [
            ("Landing Zone", "Landing_Table_1", 10),
            ("L0 / Bronze", "Bronze_Table_1", 15),
            ("L1 / Silver", "Silver_Table_1", 20),
            ("L2 / Gold", "Gold_Table_1", 25),
        ]
        .into_iter()
        .map(|(zone, table, columns)| TableZone {
            zone: zone.to_string(),
            entries: vec![TableEntry::new(table, 100_000, columns)],
            monthly_growth_percent: 0.0,
        })
        .collect();

        Self {
            version: CURRENT_VERSION,
            compute_growth_percent: 0.0,
            jobs,
            storage: StorageConfig {
                mode: StorageMode::Direct,
                direct,
                tables,
            },
            warehouses: vec![WarehouseRecord::named("Primary BI Warehouse")],
        }
    }
}

/// Number as typed into a grid cell: integer, float, text, or anything else
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LooseNumber {
    fn into_f64(self) -> f64 {
        let value = match self {
            LooseNumber::Int(i) => i as f64,
            LooseNumber::Float(f) => f,
            LooseNumber::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            LooseNumber::Other(_) => 0.0,
        };
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

fn loose_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.into_f64())
}

fn loose_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.into_f64().min(u32::MAX as f64) as u32)
}

fn entries_skipping_malformed<'de, D>(deserializer: D) -> Result<Vec<TableEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeEntry {
        Entry(TableEntry),
        Malformed(IgnoredAny),
    }

    let raw = Vec::<MaybeEntry>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|item| match item {
            MaybeEntry::Entry(entry) => Some(entry),
            MaybeEntry::Malformed(_) => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_estimate_matches_starter_session() {
        let estimate = Estimate::default();

        assert_eq!(estimate.jobs.len(), 3);
        assert_eq!(estimate.jobs.get(Tier::Silver)[0].name, "Silver Job 1");
        assert_eq!(estimate.jobs.get(Tier::Gold)[0].instance_type, "m5.large");
        assert_eq!(estimate.storage.mode, StorageMode::Direct);
        assert_eq!(estimate.storage.direct.len(), 4);
        assert_eq!(estimate.storage.direct[2].storage_class, "Infrequent Access");
        assert_eq!(estimate.storage.tables[3].entries[0].columns, 25);
        assert_eq!(estimate.warehouses[0].size, "2X-Small");
        assert_eq!(estimate.warehouses[0].hours_per_day, 8);
        assert_eq!(estimate.warehouses[0].days_per_month, 22);
    }

    #[test]
    fn test_table_entries_coerce_malformed_numbers() {
        let json = r#"{
            "zone": "Landing Zone",
            "entries": [
                {"table_name": "a", "records": "250", "columns": 4.0},
                {"table_name": "b", "records": null, "columns": "n/a"},
                {"table_name": "c", "records": -10},
                "not a table",
                42
            ]
        }"#;
        let zone: TableZone = serde_json::from_str(json).unwrap();

        assert_eq!(zone.entries.len(), 3);
        assert_eq!(zone.entries[0], TableEntry::new("a", 250, 4));
        assert_eq!(zone.entries[1], TableEntry::new("b", 0, 0));
        assert_eq!(zone.entries[2], TableEntry::new("c", 0, 0));
    }

    #[test]
    fn test_fractional_record_count_is_kept() {
        let json = r#"{"table_name": "a", "records": "1500.5", "columns": 2}"#;
        let entry: TableEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.records, 1500.5);

        let json = r#"{"table_name": "b", "records": 12.25}"#;
        let entry: TableEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.records, 12.25);
    }

    #[test]
    fn test_unknown_warehouse_type_falls_back_to_classic() {
        let json = r#"{"name": "wh", "type": "Standard", "size": "Small"}"#;
        let record: WarehouseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.warehouse_type, WarehouseType::Classic);

        let json = r#"{"name": "wh", "type": "Serverless"}"#;
        let record: WarehouseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.warehouse_type, WarehouseType::Serverless);
        assert_eq!(record.size, "2X-Small");
        assert!(record.auto_suspend);
    }

    #[test]
    fn test_paused_warehouse_is_inactive() {
        let mut record = WarehouseRecord::named("wh");
        assert!(record.is_active());
        record.days_per_month = 0;
        assert!(!record.is_active());
    }

    #[test]
    fn test_blank_table_entry() {
        assert!(TableEntry::new("  ", 0, 0).is_blank());
        assert!(!TableEntry::new("", 1, 0).is_blank());
    }
}

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::CostError;
use crate::pricing::models::{
    DirectZone, Estimate, StorageConfig, StorageMode, TableEntry, TableZone, Tier, TierJobs,
    WarehouseRecord, CURRENT_VERSION, MAX_JOBS_PER_TIER,
};
use crate::pricing::tables::PriceTable;

/// Environment overlay prefix, e.g. `CLOUD_COST__STORAGE__MODE=table`
pub const ENV_PREFIX: &str = "CLOUD_COST";

pub const DEFAULT_CONFIG_PATH: &str = "estimate.toml";

/// Records assumed for a legacy zone that never stated a count
pub const LEGACY_DEFAULT_RECORDS: f64 = 100_000.0;
pub const LEGACY_DEFAULT_COLUMNS: u32 = 10;

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default = "current_version")]
    version: u32,
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// Version 1 layout: table-mode zones were a map of zone name to a record count
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateV1 {
    #[serde(default)]
    pub jobs: TierJobs,
    #[serde(default)]
    pub storage: StorageV1,
    #[serde(default)]
    pub warehouses: Vec<WarehouseRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageV1 {
    #[serde(default)]
    pub mode: StorageMode,
    #[serde(default)]
    pub direct: Vec<DirectZone>,
    #[serde(default)]
    pub tables: BTreeMap<String, LegacyZone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyZone {
    #[serde(default = "legacy_records")]
    pub records: f64,
}

fn legacy_records() -> f64 {
    LEGACY_DEFAULT_RECORDS
}

/// Load an estimate from `path`, overlaid by `CLOUD_COST__*` environment variables
///
/// Version 1 files are migrated in memory; the file itself is never rewritten.
pub fn load_config(path: &Path) -> Result<Estimate, CostError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let probe: VersionProbe = settings.clone().try_deserialize()?;
    let estimate = match probe.version {
        1 => {
            let mut legacy: EstimateV1 = settings.try_deserialize()?;
            if let Some(tables) = legacy_zone_tables(path)? {
                legacy.storage.tables = tables;
            }
            info!(path = %path.display(), "Migrating version 1 configuration");
            migrate_v1(legacy)
        }
        CURRENT_VERSION => settings.try_deserialize()?,
        other => {
            return Err(CostError::MigrationError(format!(
                "Unsupported configuration version {} (expected 1 or {})",
                other, CURRENT_VERSION
            )))
        }
    };

    validate_estimate(&estimate)?;
    debug!(
        path = %path.display(),
        jobs = estimate.jobs.len(),
        warehouses = estimate.warehouses.len(),
        "Loaded configuration"
    );

    Ok(estimate)
}

/// Re-read the version 1 zone map from the raw file
///
/// Zone names are map keys in that layout and `config` lowercases keys, so
/// "L1 / Silver" would come back as "l1 / silver".
fn legacy_zone_tables(path: &Path) -> Result<Option<BTreeMap<String, LegacyZone>>, CostError> {
    #[derive(Deserialize)]
    struct RawV1 {
        #[serde(default)]
        storage: RawStorage,
    }

    #[derive(Default, Deserialize)]
    struct RawStorage {
        #[serde(default)]
        tables: BTreeMap<String, LegacyZone>,
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let raw: RawV1 = match extension.as_deref() {
        Some("toml") => toml::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| CostError::MigrationError(e.to_string()))?,
        Some("json") => serde_json::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| CostError::MigrationError(e.to_string()))?,
        _ => {
            warn!(path = %path.display(), "Legacy zone names keep the casing reported by the loader");
            return Ok(None);
        }
    };

    Ok(Some(raw.storage.tables))
}

/// Upgrade a version 1 estimate
///
/// Each legacy zone becomes a single table entry, and selector labels stored
/// in place of rate keys are reduced to the key.
pub fn migrate_v1(legacy: EstimateV1) -> Estimate {
    let mut zones: Vec<(String, LegacyZone)> = legacy.storage.tables.into_iter().collect();
    zones.sort_by_key(|(name, _)| (zone_rank(name), name.clone()));

    let tables = zones
        .into_iter()
        .map(|(zone, legacy_zone)| TableZone {
            entries: vec![TableEntry::new(
                format!("{} Table 1", zone.replace(" / ", "_")),
                legacy_zone.records,
                LEGACY_DEFAULT_COLUMNS,
            )],
            zone,
            monthly_growth_percent: 0.0,
        })
        .collect();

    let mut jobs = legacy.jobs;
    for tier in Tier::ALL {
        for job in jobs.get_mut(tier).iter_mut() {
            job.instance_type = instance_key(&job.instance_type);
        }
    }

    let warehouses = legacy
        .warehouses
        .into_iter()
        .map(|mut warehouse| {
            warehouse.size = warehouse_size_key(&warehouse.size);
            warehouse
        })
        .collect();

    Estimate {
        version: CURRENT_VERSION,
        compute_growth_percent: 0.0,
        jobs,
        storage: StorageConfig {
            mode: legacy.storage.mode,
            direct: legacy.storage.direct,
            tables,
        },
        warehouses,
    }
}

// "m5.large (General Purpose)" -> "m5.large"
fn instance_key(label: &str) -> String {
    label.split(" (").next().unwrap_or(label).trim().to_string()
}

// "Small - 4 DBUs - $0.88/hr" -> "Small"
fn warehouse_size_key(label: &str) -> String {
    label.split(" - ").next().unwrap_or(label).trim().to_string()
}

// Lake zones first, in pipeline order; anything else after them.
fn zone_rank(name: &str) -> usize {
    const LAKE_ORDER: [&str; 4] = ["Landing Zone", "L0 / Bronze", "L1 / Silver", "L2 / Gold"];
    LAKE_ORDER
        .iter()
        .position(|z| z.eq_ignore_ascii_case(name))
        .unwrap_or(LAKE_ORDER.len())
}

pub fn validate_estimate(estimate: &Estimate) -> Result<(), CostError> {
    if !estimate.compute_growth_percent.is_finite() || estimate.compute_growth_percent < 0.0 {
        return Err(invalid(format!(
            "compute_growth_percent must be a non-negative number, got {}",
            estimate.compute_growth_percent
        )));
    }

    for (tier, jobs) in estimate.jobs.iter() {
        if jobs.len() > MAX_JOBS_PER_TIER {
            return Err(invalid(format!(
                "{} has {} jobs, at most {} are allowed",
                tier,
                jobs.len(),
                MAX_JOBS_PER_TIER
            )));
        }
        for job in jobs {
            if !job.runtime_hours.is_finite() || job.runtime_hours < 0.0 {
                return Err(invalid(format!(
                    "{} job '{}' has invalid runtime_hours {}",
                    tier, job.name, job.runtime_hours
                )));
            }
        }
    }

    let mut seen = HashSet::new();
    for zone in &estimate.storage.direct {
        check_zone_name(&zone.zone, &mut seen, "direct")?;
        check_non_negative(zone.amount, &zone.zone, "amount")?;
        check_non_negative(zone.monthly_growth_percent, &zone.zone, "monthly_growth_percent")?;
    }

    let mut seen = HashSet::new();
    for zone in &estimate.storage.tables {
        check_zone_name(&zone.zone, &mut seen, "table")?;
        check_non_negative(zone.monthly_growth_percent, &zone.zone, "monthly_growth_percent")?;
    }

    for warehouse in &estimate.warehouses {
        if warehouse.hours_per_day > 24 {
            return Err(invalid(format!(
                "Warehouse '{}' runs {} hours per day, at most 24 are possible",
                warehouse.name, warehouse.hours_per_day
            )));
        }
        if warehouse.days_per_month > 31 {
            return Err(invalid(format!(
                "Warehouse '{}' runs {} days per month, at most 31 are possible",
                warehouse.name, warehouse.days_per_month
            )));
        }
    }

    Ok(())
}

fn check_zone_name<'a>(
    name: &'a str,
    seen: &mut HashSet<&'a str>,
    mode: &str,
) -> Result<(), CostError> {
    if name.trim().is_empty() {
        return Err(invalid(format!("{} storage zone name cannot be empty", mode)));
    }
    if !seen.insert(name) {
        return Err(invalid(format!(
            "Duplicate {} storage zone '{}'",
            mode, name
        )));
    }
    Ok(())
}

fn check_non_negative(value: f64, zone: &str, field: &str) -> Result<(), CostError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!(
            "Zone '{}' has invalid {} {}",
            zone, field, value
        )));
    }
    Ok(())
}

fn invalid(message: String) -> CostError {
    CostError::ConfigError(message)
}

/// Rate keys that are not in the price table and will be priced at zero
pub fn unknown_rate_keys(estimate: &Estimate, prices: &PriceTable) -> Vec<String> {
    let mut warnings = Vec::new();

    for (tier, jobs) in estimate.jobs.iter() {
        for job in jobs {
            if prices.instance(&job.instance_type).is_none() {
                warnings.push(format!(
                    "{} job '{}' uses unknown instance type '{}'",
                    tier, job.name, job.instance_type
                ));
            }
        }
    }

    for zone in &estimate.storage.direct {
        if prices.storage_class(&zone.storage_class).is_none() {
            warnings.push(format!(
                "Zone '{}' uses unknown storage class '{}'",
                zone.zone, zone.storage_class
            ));
        }
    }

    for warehouse in &estimate.warehouses {
        if prices.warehouse_size(&warehouse.size).is_none() {
            warnings.push(format!(
                "Warehouse '{}' uses unknown size '{}'",
                warehouse.name, warehouse.size
            ));
        }
    }

    warnings
}

/// Serialize an estimate in the current file layout
pub fn to_toml_string(estimate: &Estimate) -> Result<String, CostError> {
    Ok(toml::to_string_pretty(estimate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{JobRecord, StorageUnit};
    use crate::pricing::summary::summarize;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_default_estimate() {
        assert!(validate_estimate(&Estimate::default()).is_ok());
        assert!(validate_estimate(&Estimate::empty()).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_zone() {
        let mut estimate = Estimate::default();
        estimate
            .storage
            .direct
            .push(DirectZone::new("Landing Zone", "Glacier Instant Retrieval"));

        let result = validate_estimate(&estimate);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate direct storage zone"));
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut estimate = Estimate::default();
        estimate.storage.direct[1].amount = -5.0;

        let result = validate_estimate(&estimate);
        assert!(result.unwrap_err().to_string().contains("invalid amount"));
    }

    #[test]
    fn test_validate_warehouse_schedule_limits() {
        let mut estimate = Estimate::default();
        estimate.warehouses[0].hours_per_day = 25;
        assert!(validate_estimate(&estimate).is_err());

        estimate.warehouses[0].hours_per_day = 24;
        estimate.warehouses[0].days_per_month = 32;
        assert!(validate_estimate(&estimate).is_err());

        estimate.warehouses[0].days_per_month = 31;
        assert!(validate_estimate(&estimate).is_ok());
    }

    #[test]
    fn test_validate_job_limits() {
        let mut estimate = Estimate::empty();
        estimate.jobs.gold = (1..=21).map(|i| JobRecord::named(i, "j")).collect();
        assert!(validate_estimate(&estimate).is_err());

        let mut estimate = Estimate::empty();
        estimate.jobs.bronze.push(JobRecord {
            runtime_hours: f64::NAN,
            ..JobRecord::named(1, "nan")
        });
        assert!(validate_estimate(&estimate).is_err());
    }

    #[test]
    fn test_migrate_v1_table_zone() {
        let mut tables = BTreeMap::new();
        tables.insert("L1 / Silver".to_string(), LegacyZone { records: 250_000.0 });
        tables.insert("Landing Zone".to_string(), LegacyZone { records: 10.0 });
        let legacy = EstimateV1 {
            storage: StorageV1 {
                mode: StorageMode::Table,
                direct: vec![],
                tables,
            },
            ..EstimateV1::default()
        };

        let estimate = migrate_v1(legacy);

        assert_eq!(estimate.version, CURRENT_VERSION);
        assert_eq!(estimate.storage.mode, StorageMode::Table);
        assert_eq!(estimate.storage.tables.len(), 2);
        assert_eq!(estimate.storage.tables[0].zone, "Landing Zone");

        let silver = &estimate.storage.tables[1];
        assert_eq!(silver.entries.len(), 1);
        assert_eq!(silver.entries[0].table_name, "L1_Silver Table 1");
        assert_eq!(silver.entries[0].records, 250_000.0);
        assert_eq!(silver.entries[0].columns, 10);
    }

    #[test]
    fn test_load_current_config() {
        let file = write_config(
            r#"
version = 2
compute_growth_percent = 4.0

[[jobs.silver]]
name = "etl"
runtime_hours = 2.0
runs_per_month = 10
nodes = 3
photon = true

[storage]
mode = "direct"

[[storage.direct]]
zone = "Landing Zone"
storage_class = "Standard"
amount = 1.5
unit = "TB"

[[warehouses]]
name = "bi"
type = "Pro"
size = "Medium"
hours_per_day = 10
days_per_month = 20
"#,
        );

        let estimate = load_config(file.path()).unwrap();

        assert_eq!(estimate.compute_growth_percent, 4.0);
        let silver = estimate.jobs.get(Tier::Silver);
        assert_eq!(silver.len(), 1);
        assert_eq!(silver[0].instance_type, "m5.large");
        assert!(silver[0].photon);
        assert!(estimate.jobs.get(Tier::Bronze).is_empty());
        assert_eq!(estimate.storage.direct[0].unit, StorageUnit::TB);
        assert_eq!(estimate.warehouses[0].size, "Medium");
        assert!(estimate.warehouses[0].auto_suspend);
    }

    #[test]
    fn test_load_v1_config_migrates() {
        let file = write_config(
            r#"
version = 1

[storage]
mode = "table"

[storage.tables.bronze]
records = 5000

[storage.tables.gold]
records = 7
"#,
        );

        let estimate = load_config(file.path()).unwrap();

        assert_eq!(estimate.version, CURRENT_VERSION);
        assert_eq!(estimate.storage.tables.len(), 2);
        for zone in &estimate.storage.tables {
            assert_eq!(zone.entries.len(), 1);
            assert_eq!(zone.entries[0].columns, 10);
            assert!(zone.entries[0].table_name.ends_with(" Table 1"));
        }
        let records: Vec<f64> = estimate
            .storage
            .tables
            .iter()
            .map(|z| z.entries[0].records)
            .collect();
        assert_eq!(records, vec![5000.0, 7.0]);
    }

    #[test]
    fn test_load_v1_keeps_zone_name_casing() {
        let file = write_config(
            r#"
version = 1

[storage]
mode = "table"

[storage.tables."L1 / Silver"]
records = 5000

[storage.tables."Landing Zone"]
"#,
        );

        let estimate = load_config(file.path()).unwrap();
        let tables = &estimate.storage.tables;

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].zone, "Landing Zone");
        assert_eq!(tables[0].entries[0].table_name, "Landing Zone Table 1");
        assert_eq!(tables[0].entries[0].records, LEGACY_DEFAULT_RECORDS);
        assert_eq!(tables[1].zone, "L1 / Silver");
        assert_eq!(tables[1].entries[0].table_name, "L1_Silver Table 1");
        assert_eq!(tables[1].entries[0].records, 5000.0);
    }

    #[test]
    fn test_load_v1_reduces_selector_labels_to_rate_keys() {
        let file = write_config(
            r#"
version = 1

[[jobs.silver]]
name = "etl"
runtime_hours = 1.0
runs_per_month = 1
instance_type = "m5.xlarge (General Purpose)"

[[warehouses]]
name = "bi"
size = "Small - 4 DBUs - $0.88/hr"
hours_per_day = 8
days_per_month = 22
"#,
        );

        let estimate = load_config(file.path()).unwrap();
        assert_eq!(estimate.jobs.get(Tier::Silver)[0].instance_type, "m5.xlarge");
        assert_eq!(estimate.warehouses[0].size, "Small");
        assert!(unknown_rate_keys(&estimate, PriceTable::standard()).is_empty());

        let summary = summarize(&estimate, PriceTable::standard());
        assert!((summary.warehouse_total - 154.88).abs() < 1e-9);
        let silver = summary.tier(Tier::Silver).unwrap();
        assert!((silver.infra_cost - 0.192).abs() < 1e-12);
    }

    #[test]
    fn test_migrate_v1_leaves_plain_keys_alone() {
        let mut legacy = EstimateV1::default();
        legacy.jobs.gold.push(JobRecord::named(1, "g"));
        legacy.warehouses.push(WarehouseRecord::named("wh"));

        let estimate = migrate_v1(legacy);
        assert_eq!(estimate.jobs.gold[0].instance_type, "m5.large");
        assert_eq!(estimate.warehouses[0].size, "2X-Small");
    }

    #[test]
    fn test_legacy_zone_defaults_record_count() {
        let legacy: EstimateV1 = toml::from_str(
            r#"
[storage.tables."L2 / Gold"]
"#,
        )
        .unwrap();

        let estimate = migrate_v1(legacy);
        let entry = &estimate.storage.tables[0].entries[0];
        assert_eq!(entry.table_name, "L2_Gold Table 1");
        assert_eq!(entry.records, LEGACY_DEFAULT_RECORDS);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let file = write_config("version = 7\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(CostError::MigrationError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(CostError::ConfigError(_))));
    }

    #[test]
    fn test_starter_file_round_trips() {
        let toml = to_toml_string(&Estimate::default()).unwrap();
        let file = write_config(&toml);

        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded, Estimate::default());
    }

    #[test]
    fn test_unknown_rate_keys_are_listed() {
        let mut estimate = Estimate::default();
        estimate.jobs.bronze[0].instance_type = "z1d.large".to_string();
        estimate.storage.direct[0].storage_class = "Deep Archive".to_string();
        estimate.warehouses[0].size = "Small - 4 DBUs - $0.88/hr".to_string();

        let warnings = unknown_rate_keys(&estimate, PriceTable::standard());

        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("z1d.large"));
        assert!(warnings[1].contains("Deep Archive"));
        assert!(warnings[2].contains("Warehouse 'Primary BI Warehouse'"));
        assert!(unknown_rate_keys(&Estimate::default(), PriceTable::standard()).is_empty());
    }
}

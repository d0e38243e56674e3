//! Compiled-in price tables (USD, us-east-1 sample rates)
//!
//! Every lookup returns `Option`; the `*_or_zero` helpers apply the zero
//! default used by the calculators and log the miss.

use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

use crate::pricing::models::Tier;

/// Photon adds 20% to DBU cost
pub const PHOTON_PREMIUM_MULTIPLIER: f64 = 1.2;
/// Spot capacity is billed at 30% of on-demand
pub const SPOT_DISCOUNT_MULTIPLIER: f64 = 0.3;

pub const KB_PER_RECORD_PER_COLUMN: f64 = 0.005;
pub const GB_PER_TB: f64 = 1024.0;
pub const KB_PER_GB: f64 = 1024.0 * 1024.0;

pub const STANDARD_STORAGE_CLASS: &str = "Standard";
pub const DEFAULT_INSTANCE_TYPE: &str = "m5.large";
pub const DEFAULT_WAREHOUSE_SIZE: &str = "2X-Small";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstancePrice {
    pub instance_type: &'static str,
    pub family: &'static str,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageClassPrice {
    pub name: &'static str,
    pub per_gb_month: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarehouseSizePrice {
    pub size: &'static str,
    pub dbus_per_hour: u32,
    pub hourly_rate: f64,
}

const fn instance(instance_type: &'static str, family: &'static str, hourly_rate: f64) -> InstancePrice {
    InstancePrice {
        instance_type,
        family,
        hourly_rate,
    }
}

pub const INSTANCE_PRICES: &[InstancePrice] = &[
    instance("m5.large", "General Purpose", 0.096),
    instance("m5.xlarge", "General Purpose", 0.192),
    instance("m5.2xlarge", "General Purpose", 0.384),
    instance("m6i.large", "General Purpose", 0.096),
    instance("m6i.xlarge", "General Purpose", 0.192),
    instance("m6i.2xlarge", "General Purpose", 0.384),
    instance("c5.large", "Compute Optimized", 0.085),
    instance("c5.xlarge", "Compute Optimized", 0.17),
    instance("c5.2xlarge", "Compute Optimized", 0.34),
    instance("c6i.large", "Compute Optimized", 0.085),
    instance("c6i.xlarge", "Compute Optimized", 0.17),
    instance("c6i.2xlarge", "Compute Optimized", 0.34),
    instance("r5.large", "Memory Optimized", 0.126),
    instance("r5.xlarge", "Memory Optimized", 0.252),
    instance("r5.2xlarge", "Memory Optimized", 0.504),
    instance("r5d.large", "Memory Optimized", 0.144),
    instance("r5d.xlarge", "Memory Optimized", 0.288),
    instance("r5d.2xlarge", "Memory Optimized", 0.576),
    instance("i3.large", "Storage Optimized", 0.156),
    instance("i3.xlarge", "Storage Optimized", 0.312),
    instance("i3.2xlarge", "Storage Optimized", 0.624),
];

pub const STORAGE_CLASS_PRICES: &[StorageClassPrice] = &[
    StorageClassPrice {
        name: STANDARD_STORAGE_CLASS,
        per_gb_month: 0.023,
    },
    StorageClassPrice {
        name: "Intelligent-Tiering",
        per_gb_month: 0.023,
    },
    StorageClassPrice {
        name: "Infrequent Access",
        per_gb_month: 0.0125,
    },
    StorageClassPrice {
        name: "Glacier Instant Retrieval",
        per_gb_month: 0.004,
    },
];

pub const WAREHOUSE_SIZE_PRICES: &[WarehouseSizePrice] = &[
    WarehouseSizePrice {
        size: "2X-Small",
        dbus_per_hour: 1,
        hourly_rate: 0.22,
    },
    WarehouseSizePrice {
        size: "X-Small",
        dbus_per_hour: 2,
        hourly_rate: 0.44,
    },
    WarehouseSizePrice {
        size: "Small",
        dbus_per_hour: 4,
        hourly_rate: 0.88,
    },
    WarehouseSizePrice {
        size: "Medium",
        dbus_per_hour: 8,
        hourly_rate: 1.76,
    },
    WarehouseSizePrice {
        size: "Large",
        dbus_per_hour: 16,
        hourly_rate: 3.52,
    },
    WarehouseSizePrice {
        size: "X-Large",
        dbus_per_hour: 32,
        hourly_rate: 7.04,
    },
];

/// DBU rate per tier (USD per DBU)
pub fn dbu_rate(tier: Tier) -> f64 {
    match tier {
        Tier::Bronze => 0.15,
        Tier::Silver => 0.30,
        Tier::Gold => 0.60,
    }
}

/// Keyed view over the constant tables, built once per process
#[derive(Debug)]
pub struct PriceTable {
    instances: HashMap<&'static str, InstancePrice>,
    storage_classes: HashMap<&'static str, StorageClassPrice>,
    warehouse_sizes: HashMap<&'static str, WarehouseSizePrice>,
}

static STANDARD_PRICES: LazyLock<PriceTable> = LazyLock::new(PriceTable::build);

impl PriceTable {
    /// The shared compiled-in table
    pub fn standard() -> &'static PriceTable {
        &STANDARD_PRICES
    }

    fn build() -> Self {
        Self {
            instances: INSTANCE_PRICES
                .iter()
                .map(|p| (p.instance_type, *p))
                .collect(),
            storage_classes: STORAGE_CLASS_PRICES.iter().map(|p| (p.name, *p)).collect(),
            warehouse_sizes: WAREHOUSE_SIZE_PRICES.iter().map(|p| (p.size, *p)).collect(),
        }
    }

    pub fn dbu_rate(&self, tier: Tier) -> f64 {
        dbu_rate(tier)
    }

    pub fn instance(&self, instance_type: &str) -> Option<&InstancePrice> {
        self.instances.get(instance_type)
    }

    pub fn storage_class(&self, class: &str) -> Option<&StorageClassPrice> {
        self.storage_classes.get(class)
    }

    pub fn warehouse_size(&self, size: &str) -> Option<&WarehouseSizePrice> {
        self.warehouse_sizes.get(size)
    }

    /// Hourly on-demand rate, zero for instance types not in the catalog
    pub fn instance_rate_or_zero(&self, instance_type: &str) -> f64 {
        match self.instance(instance_type) {
            Some(price) => price.hourly_rate,
            None => {
                warn!(instance_type, "No pricing data for instance type, using zero rate");
                0.0
            }
        }
    }

    /// Per GB-month rate, zero for unknown storage classes
    pub fn storage_rate_or_zero(&self, class: &str) -> f64 {
        match self.storage_class(class) {
            Some(price) => price.per_gb_month,
            None => {
                warn!(storage_class = class, "No pricing data for storage class, using zero rate");
                0.0
            }
        }
    }

    /// Hourly rate and DBUs per hour, both zero for unknown sizes
    pub fn warehouse_rate_or_zero(&self, size: &str) -> (f64, u32) {
        match self.warehouse_size(size) {
            Some(price) => (price.hourly_rate, price.dbus_per_hour),
            None => {
                warn!(size, "No pricing data for warehouse size, using zero rate");
                (0.0, 0)
            }
        }
    }
}

/// Selector label for an instance type, e.g. "m5.large (General Purpose)"
pub fn instance_label(instance_type: &str) -> String {
    match PriceTable::standard().instance(instance_type) {
        Some(price) => format!("{} ({})", price.instance_type, price.family),
        None => instance_type.to_string(),
    }
}

/// Selector label for a warehouse size, e.g. "Small - 4 DBUs - $0.88/hr"
pub fn warehouse_size_label(size: &str) -> String {
    match PriceTable::standard().warehouse_size(size) {
        Some(price) => format!(
            "{} - {} DBUs - ${}/hr",
            price.size, price.dbus_per_hour, price.hourly_rate
        ),
        None => size.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lookups() {
        let prices = PriceTable::standard();
        assert_eq!(prices.instance_rate_or_zero("m5.xlarge"), 0.192);
        assert_eq!(prices.storage_rate_or_zero("Infrequent Access"), 0.0125);
        assert_eq!(prices.warehouse_rate_or_zero("Medium"), (1.76, 8));
        assert_eq!(prices.dbu_rate(Tier::Silver), 0.30);
    }

    #[test]
    fn test_unknown_keys_resolve_to_zero() {
        let prices = PriceTable::standard();
        assert!(prices.instance("m4.retired").is_none());
        assert_eq!(prices.instance_rate_or_zero("m4.retired"), 0.0);
        assert_eq!(prices.storage_rate_or_zero("Deep Archive"), 0.0);
        assert_eq!(prices.warehouse_rate_or_zero("4X-Large"), (0.0, 0));
    }

    #[test]
    fn test_labels_are_formatted_not_parsed() {
        assert_eq!(instance_label("r5d.large"), "r5d.large (Memory Optimized)");
        assert_eq!(warehouse_size_label("Small"), "Small - 4 DBUs - $0.88/hr");
        assert_eq!(warehouse_size_label("2X-Small"), "2X-Small - 1 DBUs - $0.22/hr");
        // a label is not a key
        assert!(PriceTable::standard()
            .warehouse_size("Small - 4 DBUs - $0.88/hr")
            .is_none());
        assert_eq!(instance_label("x9.huge"), "x9.huge");
    }

    #[test]
    fn test_catalog_keys_are_unique() {
        let prices = PriceTable::standard();
        assert_eq!(prices.instances.len(), INSTANCE_PRICES.len());
        assert_eq!(prices.storage_classes.len(), STORAGE_CLASS_PRICES.len());
        assert_eq!(prices.warehouse_sizes.len(), WAREHOUSE_SIZE_PRICES.len());
    }
}

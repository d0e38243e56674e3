use colored::Colorize;
use comfy_table::Cell;

use super::new_table;
use cloud_cost::pricing::tables::{
    dbu_rate, INSTANCE_PRICES, PHOTON_PREMIUM_MULTIPLIER, SPOT_DISCOUNT_MULTIPLIER,
    STORAGE_CLASS_PRICES, WAREHOUSE_SIZE_PRICES,
};
use cloud_cost::Tier;

/// Execute the rates command
pub fn execute() {
    let mut tiers = new_table(&["TIER", "USD / DBU"]);
    for tier in Tier::ALL {
        tiers.add_row(vec![Cell::new(tier.label()), Cell::new(format!("${:.2}", dbu_rate(tier)))]);
    }
    println!("{}", "DBU rates".bold());
    println!("{tiers}");
    println!(
        "  Photon multiplier x{}, Spot multiplier x{}",
        PHOTON_PREMIUM_MULTIPLIER, SPOT_DISCOUNT_MULTIPLIER
    );

    let mut instances = new_table(&["INSTANCE", "FAMILY", "USD / HOUR"]);
    for price in INSTANCE_PRICES {
        instances.add_row(vec![
            Cell::new(price.instance_type),
            Cell::new(price.family),
            Cell::new(format!("${:.3}", price.hourly_rate)),
        ]);
    }
    println!();
    println!("{}", "EC2 instances".bold());
    println!("{instances}");

    let mut storage = new_table(&["STORAGE CLASS", "USD / GB-MONTH"]);
    for price in STORAGE_CLASS_PRICES {
        storage.add_row(vec![
            Cell::new(price.name),
            Cell::new(format!("${:.4}", price.per_gb_month)),
        ]);
    }
    println!();
    println!("{}", "S3 storage".bold());
    println!("{storage}");

    let mut warehouses = new_table(&["SIZE", "DBUS / HOUR", "USD / HOUR"]);
    for price in WAREHOUSE_SIZE_PRICES {
        warehouses.add_row(vec![
            Cell::new(price.size),
            Cell::new(price.dbus_per_hour),
            Cell::new(format!("${:.2}", price.hourly_rate)),
        ]);
    }
    println!();
    println!("{}", "SQL warehouse sizes".bold());
    println!("{warehouses}");
}

//! Estimate command implementation
//!
//! Prints the monthly cost summary for the configured estimate: category
//! totals with their share, per-tier compute totals, and the 12-month
//! outlook. `--detailed` adds per-job, per-zone and per-warehouse rows.

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use std::path::Path;
use tracing::info;

use super::{format_currency, new_table};
use cloud_cost::config::load_config;
use cloud_cost::pricing::{instance_label, warehouse_size_label, CostCategory, CostSummary};
use cloud_cost::Session;

/// Execute the estimate command
pub fn execute(config_path: &Path, detailed: bool, json: bool) -> Result<()> {
    let estimate = load_config(config_path)?;
    let session = Session::new(estimate);
    let summary = session.summary();
    info!(grand_total = summary.grand_total, "Estimate computed");

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Estimated monthly cost:".bold(),
        format_currency(summary.grand_total).green().bold()
    );
    println!();
    print_categories(&summary);
    print_tiers(&summary);

    if detailed {
        print_jobs(&summary);
        print_storage(&summary);
        print_warehouses(&summary);
    }

    Ok(())
}

fn print_categories(summary: &CostSummary) {
    let mut table = new_table(&["CATEGORY", "MONTHLY", "SHARE", "12-MONTH"]);

    let projected = [
        (CostCategory::Compute, summary.projection.compute),
        (CostCategory::Storage, summary.projection.storage),
        (CostCategory::Warehouse, summary.projection.warehouse),
    ];
    for (category, twelve_month) in projected {
        let amount = summary.category_total(category);
        let share = if summary.grand_total > 0.0 {
            format!("{:.1}%", amount / summary.grand_total * 100.0)
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(category.label()),
            Cell::new(format_currency(amount)),
            Cell::new(share),
            Cell::new(format_currency(twelve_month)),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Green),
        Cell::new(format_currency(summary.grand_total)).fg(Color::Green),
        Cell::new(""),
        Cell::new(format_currency(summary.projection.total)).fg(Color::Green),
    ]);

    println!("{table}");
}

fn print_tiers(summary: &CostSummary) {
    let mut table = new_table(&["TIER", "JOBS", "DBU COST", "EC2 COST", "TOTAL"]);

    for tier in &summary.tiers {
        table.add_row(vec![
            Cell::new(tier.tier.label()),
            Cell::new(tier.jobs.len()),
            Cell::new(format_currency(tier.compute_cost)),
            Cell::new(format_currency(tier.infra_cost)),
            Cell::new(format_currency(tier.total())),
        ]);
    }

    table.add_row(vec![
        Cell::new("ALL TIERS").fg(Color::Green),
        Cell::new(summary.job_count).fg(Color::Green),
        Cell::new(format_currency(summary.dbu_total)).fg(Color::Green),
        Cell::new(format_currency(summary.ec2_total)).fg(Color::Green),
        Cell::new(format_currency(summary.databricks_total)).fg(Color::Green),
    ]);

    println!();
    println!("{}", "Databricks jobs".bold());
    println!("{table}");
}

fn print_jobs(summary: &CostSummary) {
    for tier in &summary.tiers {
        println!();
        println!("{}", tier.tier.label().bold());
        if tier.jobs.is_empty() {
            println!("  {}", "No jobs".dimmed());
            continue;
        }

        let mut table = new_table(tier.columns());
        for cost in &tier.jobs {
            let job = &cost.job;
            table.add_row(vec![
                Cell::new(job.seq),
                Cell::new(&job.name),
                Cell::new(format!("{:.2}", job.runtime_hours)),
                Cell::new(job.runs_per_month),
                Cell::new(instance_label(&job.instance_type)),
                Cell::new(job.nodes),
                Cell::new(yes_no(job.photon)),
                Cell::new(yes_no(job.spot)),
                Cell::new(format!("{:.2}", cost.units)),
                Cell::new(format_currency(cost.compute_cost)),
                Cell::new(format_currency(cost.infra_cost)),
                Cell::new(format_currency(cost.total_cost)),
            ]);
        }
        println!("{table}");
    }
}

fn print_storage(summary: &CostSummary) {
    let mut table = new_table(&["ZONE", "CAPACITY (GB)", "MONTHLY", "12-MONTH"]);

    for zone in &summary.storage.zones {
        table.add_row(vec![
            Cell::new(&zone.zone),
            Cell::new(format!("{:.4}", zone.capacity_gb)),
            Cell::new(format_currency(zone.current_cost)),
            Cell::new(format_currency(zone.projected_cost)),
        ]);
    }

    println!();
    println!(
        "{} ({:?} mode)",
        "S3 storage".bold(),
        summary.storage.mode
    );
    println!("{table}");
}

fn print_warehouses(summary: &CostSummary) {
    let mut table = new_table(&["NAME", "TYPE", "SIZE", "HOURS/DAY", "DAYS/MONTH", "MONTHLY"]);

    for warehouse in &summary.warehouses.warehouses {
        let monthly = if warehouse.active {
            Cell::new(format_currency(warehouse.monthly_cost))
        } else {
            Cell::new("paused").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&warehouse.name),
            Cell::new(warehouse.warehouse_type),
            Cell::new(warehouse_size_label(&warehouse.size)),
            Cell::new(warehouse.hours_per_day),
            Cell::new(warehouse.days_per_month),
            monthly,
        ]);
    }

    println!();
    println!(
        "{} ({} of {} active)",
        "SQL warehouses".bold(),
        summary.warehouses.active_count(),
        summary.warehouses.warehouses.len()
    );
    println!("{table}");
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

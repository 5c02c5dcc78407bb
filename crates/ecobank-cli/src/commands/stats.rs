//! Stats command - totals and eco-score for one owner

use chrono::{DateTime, FixedOffset};
use ecobank_carbon::{CarbonService, CarbonStatsReport, OwnerId};

use crate::display;

pub fn print(report: &CarbonStatsReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    display::section(&format!("Carbon stats for {}", report.owner_id));
    display::labeled("Total footprint", &display::grams(report.total_footprint));
    display::labeled("This month", &display::grams(report.monthly_footprint));
    display::labeled("Monthly budget", &display::grams(report.monthly_budget));
    match report.utilization_ratio {
        Some(ratio) => display::labeled("Utilization", &ratio.to_string()),
        None => display::info("No positive budget, utilization not scored"),
    }
    println!("  Eco-score: {}", display::score(report.eco_score));
    Ok(())
}

pub async fn run(
    service: &CarbonService,
    owner: OwnerId,
    now: &DateTime<FixedOffset>,
    json: bool,
) -> anyhow::Result<()> {
    let report = service.stats_for_owner(owner, now).await?;
    print(&report, json)
}

//! Breakdown command - emissions by category

use colored::*;
use ecobank_carbon::{CarbonService, OwnerId};
use rust_decimal::prelude::ToPrimitive;

use crate::display;

pub async fn run(service: &CarbonService, owner: OwnerId, json: bool) -> anyhow::Result<()> {
    let entries = service.breakdown_for_owner(owner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    display::section(&format!("Category breakdown for {}", owner));
    if entries.is_empty() {
        display::info("No transactions");
        return Ok(());
    }

    for entry in &entries {
        let share = entry.share_percent.to_f64().unwrap_or(0.0);
        println!(
            "  {:<14} {} {:>6}%  {:>14}  ({} tx, spent {})",
            entry.category.code().bright_white(),
            display::bar(share, 20).as_str().bright_green(),
            entry.share_percent,
            display::grams(entry.total_footprint),
            entry.transaction_count,
            entry.total_amount
        );
    }
    Ok(())
}

//! Footprint command - price a single purchase

use colored::*;
use ecobank_carbon::{CarbonService, FootprintCalculation};
use rust_decimal::Decimal;

use crate::display;

pub fn print(detail: &FootprintCalculation, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(detail)?);
        return Ok(());
    }

    display::section("Footprint");
    display::labeled("Category", detail.category.code());
    display::labeled("Amount", &detail.amount.to_string());
    display::labeled("Factor", &format!("{} ({:?})", detail.factor, detail.source));
    display::labeled("Method", &detail.method);
    println!();
    println!(
        "  {} {}",
        "Footprint:".bright_white().bold(),
        display::grams(detail.footprint).as_str().bright_yellow().bold()
    );
    Ok(())
}

pub fn run(
    service: &CarbonService,
    amount: Decimal,
    category: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let detail = service.calculator().compute_detailed_str(amount, category)?;
    print(&detail, json)
}

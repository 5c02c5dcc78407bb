//! History command - monthly footprint series

use chrono::{DateTime, FixedOffset};
use colored::*;
use ecobank_carbon::{CarbonService, OwnerId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::display;

pub async fn run(
    service: &CarbonService,
    owner: OwnerId,
    now: &DateTime<FixedOffset>,
    months: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let history = service.history_for_owner(owner, now, months).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    display::section(&format!("Monthly footprint for {}", owner));
    let peak = history
        .iter()
        .map(|m| m.footprint)
        .max()
        .unwrap_or(Decimal::ZERO);

    for month in &history {
        let percent = if peak.is_zero() {
            0.0
        } else {
            (month.footprint / peak * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
        };
        println!(
            "  {:04}-{:02}  {} {}",
            month.year,
            month.month,
            display::bar(percent, 30).as_str().bright_green(),
            display::grams(month.footprint)
        );
    }
    Ok(())
}

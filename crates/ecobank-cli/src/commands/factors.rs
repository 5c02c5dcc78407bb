//! Factors command - the effective factor table

use colored::*;
use ecobank_carbon::{CarbonService, FactorSource};

use crate::display;

pub fn run(service: &CarbonService, json: bool) -> anyhow::Result<()> {
    let factors = service.factors().list();

    if json {
        println!("{}", serde_json::to_string_pretty(&factors)?);
        return Ok(());
    }

    display::section("Emission factors (g CO2e per unit spent)");
    for factor in &factors {
        let source = match factor.source {
            FactorSource::Stored => "stored".bright_cyan(),
            FactorSource::Default => "default".bright_black(),
            FactorSource::Global => "global".yellow(),
        };
        println!(
            "  {:<14} {:>6}  {:<8} {}",
            factor.category.code().bright_white(),
            factor.factor,
            source,
            factor.description
        );
    }
    println!();
    display::info(&format!(
        "Unknown categories use {}",
        service.factors().global_default()
    ));
    Ok(())
}

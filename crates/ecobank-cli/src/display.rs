//! Display utilities for the CLI

use colored::*;
use ecobank_carbon::EcoScore;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a labeled value
pub fn labeled(label: &str, value: &str) {
    println!("  {}: {}", label.bright_white(), value.bright_cyan());
}

/// Format a gram amount for display
pub fn grams(value: impl std::fmt::Display) -> String {
    format!("{} g CO2e", value)
}

/// Eco-score colored by band
pub fn score(score: EcoScore) -> ColoredString {
    let text = format!("{}/100", score.value());
    match score {
        EcoScore::Excellent => text.bright_green().bold(),
        EcoScore::Good => text.green(),
        EcoScore::Fair => text.yellow(),
        EcoScore::Poor => text.bright_red(),
        EcoScore::Critical => text.red().bold(),
    }
}

/// A proportional bar for a percentage in [0, 100]
pub fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round().clamp(0.0, width as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_is_clamped() {
        assert_eq!(bar(0.0, 10), "░".repeat(10));
        assert_eq!(bar(50.0, 10), format!("{}{}", "█".repeat(5), "░".repeat(5)));
        assert_eq!(bar(250.0, 4), "█".repeat(4));
    }
}

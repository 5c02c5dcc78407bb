//! Eco-score banding
//!
//! The utilization ratio `monthly / budget` is rounded half-up at 4 decimal
//! places before banding. Each band's upper edge belongs to that band.

use ecobank_types::EcoScore;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Decimal places kept on the utilization ratio
pub const RATIO_SCALE: u32 = 4;

/// Result of scoring one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// `None` when the budget was not positive
    pub ratio: Option<Decimal>,
    pub eco_score: EcoScore,
}

/// Maps budget utilization to an [`EcoScore`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EcoScoreEngine;

impl EcoScoreEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score a monthly footprint against a budget.
    ///
    /// A zero or negative budget scores [`EcoScore::Excellent`] without a
    /// ratio. A ratio too large to represent counts as the worst band.
    pub fn score(&self, monthly: Decimal, budget: Decimal) -> ScoreOutcome {
        if budget <= Decimal::ZERO {
            return ScoreOutcome {
                ratio: None,
                eco_score: EcoScore::Excellent,
            };
        }

        let ratio = monthly
            .checked_div(budget)
            .map(|r| r.round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero))
            .unwrap_or(Decimal::MAX);

        ScoreOutcome {
            ratio: Some(ratio),
            eco_score: Self::band_for_ratio(ratio),
        }
    }

    /// Band for an already-rounded ratio
    pub fn band_for_ratio(ratio: Decimal) -> EcoScore {
        if ratio <= dec!(0.50) {
            EcoScore::Excellent
        } else if ratio <= dec!(0.75) {
            EcoScore::Good
        } else if ratio <= dec!(1.00) {
            EcoScore::Fair
        } else if ratio <= dec!(1.25) {
            EcoScore::Poor
        } else {
            EcoScore::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenarios() {
        let engine = EcoScoreEngine::new();
        assert_eq!(engine.score(dec!(50000), dec!(100000)).eco_score.value(), 100);
        assert_eq!(engine.score(dec!(75000), dec!(100000)).eco_score.value(), 75);
        assert_eq!(engine.score(dec!(50000), Decimal::ZERO).eco_score.value(), 100);
    }

    #[test]
    fn test_band_edges_belong_to_lower_band() {
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(0)), EcoScore::Excellent);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(0.5)), EcoScore::Excellent);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(0.5001)), EcoScore::Good);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(0.75)), EcoScore::Good);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(0.7501)), EcoScore::Fair);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(1.0)), EcoScore::Fair);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(1.0001)), EcoScore::Poor);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(1.25)), EcoScore::Poor);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(1.2501)), EcoScore::Critical);
        assert_eq!(EcoScoreEngine::band_for_ratio(dec!(40)), EcoScore::Critical);
    }

    #[test]
    fn test_ratio_is_rounded_before_banding() {
        let engine = EcoScoreEngine::new();
        // 0.500049... rounds down to 0.5000
        let outcome = engine.score(dec!(500.049), dec!(1000));
        assert_eq!(outcome.ratio, Some(dec!(0.5000)));
        assert_eq!(outcome.eco_score, EcoScore::Excellent);

        // 0.50005 rounds half-up to 0.5001
        let outcome = engine.score(dec!(500.05), dec!(1000));
        assert_eq!(outcome.ratio, Some(dec!(0.5001)));
        assert_eq!(outcome.eco_score, EcoScore::Good);
    }

    #[test]
    fn test_non_positive_budget_has_no_ratio() {
        let engine = EcoScoreEngine::new();
        let outcome = engine.score(dec!(10), dec!(-5));
        assert_eq!(outcome.ratio, None);
        assert_eq!(outcome.eco_score, EcoScore::Excellent);
    }

    #[test]
    fn test_every_band() {
        let engine = EcoScoreEngine::new();
        let budget = dec!(1000);
        let scores: Vec<u8> = [dec!(100), dec!(600), dec!(900), dec!(1200), dec!(5000)]
            .iter()
            .map(|m| engine.score(*m, budget).eco_score.value())
            .collect();
        assert_eq!(scores, vec![100, 75, 50, 25, 0]);
    }

    #[test]
    fn test_overflowing_ratio_is_critical() {
        let engine = EcoScoreEngine::new();
        let outcome = engine.score(Decimal::MAX, dec!(0.0000001));
        assert_eq!(outcome.eco_score, EcoScore::Critical);
    }
}

//! Report shapes returned to the application boundary
//!
//! Reports are recomputed on every request and never persisted as
//! authoritative state.

use crate::{CarbonError, Category, OwnerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete eco-score reflecting monthly budget adherence.
///
/// Serialized as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EcoScore {
    /// Utilization above 1.25
    Critical,
    /// Utilization in (1.00, 1.25]
    Poor,
    /// Utilization in (0.75, 1.00]
    Fair,
    /// Utilization in (0.50, 0.75]
    Good,
    /// Utilization at or below 0.50, or no positive budget
    Excellent,
}

impl EcoScore {
    /// Numeric score in {0, 25, 50, 75, 100}
    pub fn value(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Poor => 25,
            Self::Fair => 50,
            Self::Good => 75,
            Self::Excellent => 100,
        }
    }

    /// The highest score
    pub fn max() -> Self {
        Self::Excellent
    }
}

impl Default for EcoScore {
    fn default() -> Self {
        Self::max()
    }
}

impl fmt::Display for EcoScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<EcoScore> for u8 {
    fn from(score: EcoScore) -> Self {
        score.value()
    }
}

impl TryFrom<u8> for EcoScore {
    type Error = CarbonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Critical),
            25 => Ok(Self::Poor),
            50 => Ok(Self::Fair),
            75 => Ok(Self::Good),
            100 => Ok(Self::Excellent),
            other => Err(CarbonError::invalid_input(
                "eco_score",
                format!("{} is not one of 0, 25, 50, 75, 100", other),
            )),
        }
    }
}

/// Overall carbon stats for one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonStatsReport {
    pub owner_id: OwnerId,
    /// Sum of every footprint the owner has
    pub total_footprint: Decimal,
    /// Sum of footprints in the reference month
    pub monthly_footprint: Decimal,
    /// Budget the score was computed against
    pub monthly_budget: Decimal,
    /// Monthly footprint over budget; `None` when the budget is not positive
    pub utilization_ratio: Option<Decimal>,
    pub eco_score: EcoScore,
}

/// One category's share of an owner's emissions and spend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdownEntry {
    pub category: Category,
    pub total_footprint: Decimal,
    pub total_amount: Decimal,
    pub transaction_count: usize,
    /// Percentage of the grand-total footprint, 0 when that total is 0
    pub share_percent: Decimal,
}

/// Footprint of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFootprint {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    pub footprint: Decimal,
}

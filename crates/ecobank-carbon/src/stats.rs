//! Report assembly

use chrono::{DateTime, TimeZone};
use ecobank_types::{
    CarbonStatsReport, CategoryBreakdownEntry, MonthlyFootprint, OwnerId, Result,
    TransactionRecord,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::debug;

use crate::aggregate::CarbonAggregator;
use crate::score::EcoScoreEngine;

/// Decimal places kept on category shares
pub const SHARE_SCALE: u32 = 2;

/// Composes aggregation and scoring into report shapes
#[derive(Debug, Clone, Default)]
pub struct StatsAssembler {
    aggregator: CarbonAggregator,
    scorer: EcoScoreEngine,
}

impl StatsAssembler {
    pub fn new(aggregator: CarbonAggregator, scorer: EcoScoreEngine) -> Self {
        Self { aggregator, scorer }
    }

    pub fn aggregator(&self) -> &CarbonAggregator {
        &self.aggregator
    }

    pub fn scorer(&self) -> &EcoScoreEngine {
        &self.scorer
    }

    /// Overall stats for one owner.
    ///
    /// `budget` is the budget supplied by the caller; when it is `None` the
    /// owner's configured default is used. A zero budget is not the same as a
    /// missing one and scores as a non-positive budget.
    pub fn build_stats<Tz: TimeZone>(
        &self,
        owner_id: OwnerId,
        records: &[TransactionRecord],
        budget: Option<Decimal>,
        owner_default: Decimal,
        reference: &DateTime<Tz>,
    ) -> Result<CarbonStatsReport> {
        let monthly_budget = budget.unwrap_or(owner_default);
        let total_footprint = self.aggregator.total_footprint(records)?;
        let monthly_footprint = self.aggregator.monthly_footprint(records, reference)?;
        let outcome = self.scorer.score(monthly_footprint, monthly_budget);

        debug!(
            owner_id = %owner_id,
            monthly = %monthly_footprint,
            budget = %monthly_budget,
            eco_score = %outcome.eco_score,
            "Carbon stats assembled"
        );

        Ok(CarbonStatsReport {
            owner_id,
            total_footprint,
            monthly_footprint,
            monthly_budget,
            utilization_ratio: outcome.ratio,
            eco_score: outcome.eco_score,
        })
    }

    /// Per-category breakdown in order of first appearance
    pub fn build_breakdown(&self, records: &[TransactionRecord]) -> Result<Vec<CategoryBreakdownEntry>> {
        let grand_total = self.aggregator.total_footprint(records)?;

        Ok(self
            .aggregator
            .by_category(records)?
            .into_iter()
            .map(|group| CategoryBreakdownEntry {
                share_percent: share_of(group.total_footprint, grand_total),
                category: group.category,
                total_footprint: group.total_footprint,
                total_amount: group.total_amount,
                transaction_count: group.count,
            })
            .collect())
    }

    /// Monthly totals for the `months` months ending with the reference month
    pub fn build_history<Tz: TimeZone>(
        &self,
        records: &[TransactionRecord],
        reference: &DateTime<Tz>,
        months: usize,
    ) -> Result<Vec<MonthlyFootprint>> {
        self.aggregator.monthly_history(records, reference, months)
    }
}

/// `part` as a percentage of `total`, where `0 <= part <= total`
fn share_of(part: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(total)
        .and_then(|fraction| fraction.checked_mul(dec!(100)))
        .map(|share| share.round_dp_with_strategy(SHARE_SCALE, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

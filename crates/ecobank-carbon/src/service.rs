//! Carbon Service
//!
//! The boundary resolvers and controllers call. Owns the factor table and
//! wires the calculator, aggregator and scorer to the external sources.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use ecobank_types::{
    CarbonError, CarbonStatsReport, Category, CategoryBreakdownEntry, EcoScore, EmissionFactor,
    FootprintValue, MonthlyFootprint, OwnerId, Result, TransactionEdit, TransactionRecord,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::aggregate::CarbonAggregator;
use crate::config::{ConfigError, EngineConfig};
use crate::factors::EmissionFactorTable;
use crate::footprint::FootprintCalculator;
use crate::score::EcoScoreEngine;
use crate::stats::StatsAssembler;
use crate::store::{BudgetSource, FactorStore, TransactionSource};

/// Carbon accounting service
pub struct CarbonService {
    config: EngineConfig,
    factors: Arc<EmissionFactorTable>,
    calculator: FootprintCalculator,
    assembler: StatsAssembler,
    transactions: Arc<dyn TransactionSource>,
    budgets: Arc<dyn BudgetSource>,
}

impl CarbonService {
    /// Validate the configuration, seed the factor store if configured, and
    /// load stored factors.
    pub async fn start(
        config: EngineConfig,
        factor_store: Arc<dyn FactorStore>,
        transactions: Arc<dyn TransactionSource>,
        budgets: Arc<dyn BudgetSource>,
    ) -> Result<Self> {
        config.validate().map_err(|e| match e {
            ConfigError::Invalid { field, reason } => CarbonError::invalid_input(field, reason),
            other => CarbonError::invalid_input("config", other.to_string()),
        })?;

        let factors = Arc::new(EmissionFactorTable::open(factor_store, &config).await?);
        Ok(Self::with_factors(config, factors, transactions, budgets))
    }

    /// Build a service over an already opened factor table
    pub fn with_factors(
        config: EngineConfig,
        factors: Arc<EmissionFactorTable>,
        transactions: Arc<dyn TransactionSource>,
        budgets: Arc<dyn BudgetSource>,
    ) -> Self {
        info!(
            default_budget = %config.default_monthly_budget,
            history_months = config.history_months,
            "Carbon service started"
        );

        Self {
            calculator: FootprintCalculator::new(factors.clone()),
            assembler: StatsAssembler::new(CarbonAggregator::new(), EcoScoreEngine::new()),
            config,
            factors,
            transactions,
            budgets,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn factors(&self) -> &Arc<EmissionFactorTable> {
        &self.factors
    }

    pub fn calculator(&self) -> &FootprintCalculator {
        &self.calculator
    }

    // =========================================================================
    // Footprints
    // =========================================================================

    /// Footprint of a new transaction. An unset or blank category prices as
    /// the fallback bucket.
    pub fn compute_footprint(&self, amount: Decimal, category: Option<&str>) -> Result<FootprintValue> {
        self.calculator.compute_str(amount, category)
    }

    /// Footprint after an edit; unchanged fields are passed as `None`.
    ///
    /// A blank `new_category` also keeps the old category. A blank or unset
    /// `old_category` is the fallback bucket, as in
    /// [`compute_footprint`](Self::compute_footprint).
    pub fn recompute_footprint(
        &self,
        old_amount: Decimal,
        old_category: Option<&str>,
        new_amount: Option<Decimal>,
        new_category: Option<&str>,
    ) -> Result<FootprintValue> {
        let old_category = parse_optional(old_category)?;
        let new_category = parse_optional(new_category)?;
        self.calculator.recompute(
            old_amount,
            old_category.as_ref(),
            new_amount,
            new_category.as_ref(),
        )
    }

    /// Apply an edit to a record, recomputing the footprint when needed
    pub fn apply_edit(&self, record: &TransactionRecord, edit: &TransactionEdit) -> Result<TransactionRecord> {
        self.calculator.apply_edit(record, edit)
    }

    /// Create or overwrite a factor
    pub async fn upsert_factor(&self, category: &str, factor: Decimal) -> Result<EmissionFactor> {
        self.factors.upsert(category, factor).await
    }

    // =========================================================================
    // Reports over caller-supplied records
    // =========================================================================

    /// Overall stats. A missing budget is looked up for the owner, then
    /// falls back to the configured default.
    pub async fn get_stats(
        &self,
        owner: OwnerId,
        records: &[TransactionRecord],
        budget: Option<Decimal>,
        now: &DateTime<FixedOffset>,
    ) -> Result<CarbonStatsReport> {
        let budget = match budget {
            Some(budget) => Some(budget),
            None => self.fetch_budget(&owner).await?,
        };

        self.assembler.build_stats(
            owner,
            records,
            budget,
            self.config.default_monthly_budget,
            now,
        )
    }

    pub fn get_breakdown(&self, records: &[TransactionRecord]) -> Result<Vec<CategoryBreakdownEntry>> {
        self.assembler.build_breakdown(records)
    }

    /// Monthly totals, oldest first; `months` defaults to the configured length
    pub fn get_monthly_history(
        &self,
        records: &[TransactionRecord],
        now: &DateTime<FixedOffset>,
        months: Option<usize>,
    ) -> Result<Vec<MonthlyFootprint>> {
        let months = months.unwrap_or(self.config.history_months);
        self.assembler.build_history(records, now, months)
    }

    // =========================================================================
    // Owner-scoped reports
    // =========================================================================

    pub async fn stats_for_owner(&self, owner: OwnerId, now: &DateTime<FixedOffset>) -> Result<CarbonStatsReport> {
        let records = self.fetch_records(&owner).await?;
        self.get_stats(owner, &records, None, now).await
    }

    pub async fn breakdown_for_owner(&self, owner: OwnerId) -> Result<Vec<CategoryBreakdownEntry>> {
        let records = self.fetch_records(&owner).await?;
        self.get_breakdown(&records)
    }

    pub async fn history_for_owner(
        &self,
        owner: OwnerId,
        now: &DateTime<FixedOffset>,
        months: Option<usize>,
    ) -> Result<Vec<MonthlyFootprint>> {
        let records = self.fetch_records(&owner).await?;
        self.get_monthly_history(&records, now, months)
    }

    /// Recompute an owner's eco-score from current data.
    ///
    /// Callers that cache the score on the owner should overwrite it with
    /// this value; the cache is never authoritative.
    pub async fn refresh_eco_score(&self, owner: OwnerId, now: &DateTime<FixedOffset>) -> Result<EcoScore> {
        let report = self.stats_for_owner(owner, now).await?;
        info!(owner_id = %owner, eco_score = %report.eco_score, "Eco-score refreshed");
        Ok(report.eco_score)
    }

    /// An owner's transactions in one category
    pub async fn transactions_in_category(
        &self,
        owner: OwnerId,
        category: &str,
    ) -> Result<Vec<TransactionRecord>> {
        let category = Category::parse(category)?;
        let records = self.fetch_records(&owner).await?;
        Ok(self
            .assembler
            .aggregator()
            .in_category(&records, &category)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn fetch_records(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>> {
        self.transactions.fetch_transactions(owner).await.map_err(|e| {
            warn!(owner_id = %owner, error = %e, "Transaction source failed");
            e
        })
    }

    async fn fetch_budget(&self, owner: &OwnerId) -> Result<Option<Decimal>> {
        self.budgets.fetch_budget(owner).await.map_err(|e| {
            warn!(owner_id = %owner, error = %e, "Budget source failed");
            e
        })
    }
}

fn parse_optional(raw: Option<&str>) -> Result<Option<Category>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Category::parse(raw).map(Some),
        _ => Ok(None),
    }
}

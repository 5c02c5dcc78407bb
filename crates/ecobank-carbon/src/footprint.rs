//! Footprint calculation
//!
//! `footprint = round_half_away_from_zero(amount × factor, 2)`

use std::sync::Arc;

use ecobank_types::{
    CarbonError, Category, FactorSource, FootprintValue, Result, TransactionEdit,
    TransactionRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::factors::EmissionFactorTable;

/// Calculation method recorded with every detailed footprint
pub const SPEND_BASED_METHOD: &str = "spend-based";

/// A footprint together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintCalculation {
    pub category: Category,
    pub amount: Decimal,
    pub factor: Decimal,
    pub source: FactorSource,
    pub footprint: FootprintValue,
    pub method: String,
}

/// Converts spend into grams CO2e
#[derive(Clone)]
pub struct FootprintCalculator {
    factors: Arc<EmissionFactorTable>,
}

impl FootprintCalculator {
    pub fn new(factors: Arc<EmissionFactorTable>) -> Self {
        Self { factors }
    }

    /// Footprint of spending `amount` in `category`
    pub fn compute(&self, amount: Decimal, category: &Category) -> Result<FootprintValue> {
        Ok(self.compute_detailed(amount, category)?.footprint)
    }

    /// Footprint for a caller-supplied category string.
    ///
    /// An unset or blank category uses the fallback bucket.
    pub fn compute_str(&self, amount: Decimal, raw_category: Option<&str>) -> Result<FootprintValue> {
        Ok(self.compute_detailed_str(amount, raw_category)?.footprint)
    }

    /// [`compute_detailed`](Self::compute_detailed) for a caller-supplied
    /// category string, normalized as in [`compute_str`](Self::compute_str)
    pub fn compute_detailed_str(
        &self,
        amount: Decimal,
        raw_category: Option<&str>,
    ) -> Result<FootprintCalculation> {
        let category = match raw_category {
            Some(raw) if !raw.trim().is_empty() => Category::parse(raw)?,
            _ => Category::fallback(),
        };
        self.compute_detailed(amount, &category)
    }

    /// Footprint with the factor and its provenance
    pub fn compute_detailed(&self, amount: Decimal, category: &Category) -> Result<FootprintCalculation> {
        if amount < Decimal::ZERO {
            return Err(CarbonError::invalid_input(
                "amount",
                format!("must not be negative, got {}", amount),
            ));
        }

        let resolved = self.factors.resolve_detailed(category);
        let raw = amount.checked_mul(resolved.factor).ok_or_else(|| {
            CarbonError::invalid_input("amount", format!("{} × {} overflows", amount, resolved.factor))
        })?;
        let footprint = FootprintValue::round(raw)?;

        debug!(
            category = %category,
            amount = %amount,
            factor = %resolved.factor,
            footprint = %footprint,
            "Footprint computed"
        );

        Ok(FootprintCalculation {
            category: category.clone(),
            amount,
            factor: resolved.factor,
            source: resolved.source,
            footprint,
            method: SPEND_BASED_METHOD.to_string(),
        })
    }

    /// Footprint after an edit that may change amount and category.
    ///
    /// Fields the edit leaves out keep their old values.
    pub fn recompute(
        &self,
        old_amount: Decimal,
        old_category: Option<&Category>,
        new_amount: Option<Decimal>,
        new_category: Option<&Category>,
    ) -> Result<FootprintValue> {
        let amount = new_amount.unwrap_or(old_amount);
        let category = new_category
            .or(old_category)
            .cloned()
            .unwrap_or_else(Category::fallback);
        self.compute(amount, &category)
    }

    /// Apply an edit to a record, returning the updated copy.
    ///
    /// The footprint is recomputed only when the edit supplies an amount or a
    /// category. Amount, category and footprint change together in the
    /// returned value; the input record is left untouched.
    pub fn apply_edit(&self, record: &TransactionRecord, edit: &TransactionEdit) -> Result<TransactionRecord> {
        let mut updated = record.clone();

        if edit.touches_footprint() {
            updated.footprint = self.recompute(
                record.amount,
                record.category.as_ref(),
                edit.amount,
                edit.category.as_ref(),
            )?;
            if let Some(amount) = edit.amount {
                updated.amount = amount;
            }
            if let Some(category) = &edit.category {
                updated.category = Some(category.clone());
            }
        }

        if let Some(merchant) = &edit.merchant {
            updated.merchant = Some(merchant.clone());
        }
        if let Some(description) = &edit.description {
            updated.description = Some(description.clone());
        }
        if let Some(location) = &edit.location {
            updated.location = Some(location.clone());
        }

        Ok(updated)
    }
}

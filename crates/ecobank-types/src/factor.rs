//! Emission factors
//!
//! An emission factor converts one unit of currency spent in a category into
//! grams of CO2e. At most one stored factor exists per normalized category.

use crate::{CarbonError, Category, FactorId, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored emission factor row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Stable identity, preserved across updates
    pub id: FactorId,
    /// Normalized category this factor applies to
    pub category: Category,
    /// Grams CO2e per currency unit, never negative
    pub factor: Decimal,
    /// Human-readable description
    pub description: String,
    /// Last time the factor value changed
    pub updated_at: DateTime<Utc>,
}

impl EmissionFactor {
    /// Create a new factor row with a fresh identity
    pub fn new(category: Category, factor: Decimal, description: impl Into<String>) -> Result<Self> {
        validate_factor(factor)?;
        Ok(Self {
            id: FactorId::new(),
            category,
            factor,
            description: description.into(),
            updated_at: Utc::now(),
        })
    }

    /// Description given to rows created by an administrative upsert
    pub fn auto_description(category: &Category) -> String {
        format!("Auto-generated factor for {}", category)
    }
}

/// Check that a factor value is usable.
///
/// Zero is accepted (the GREEN reference factor is zero); negative values
/// are rejected.
pub fn validate_factor(factor: Decimal) -> Result<()> {
    if factor < Decimal::ZERO {
        return Err(CarbonError::invalid_input(
            "factor",
            format!("must not be negative, got {}", factor),
        ));
    }
    Ok(())
}

/// Where a resolved factor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorSource {
    /// An explicitly stored row
    Stored,
    /// The built-in reference table
    Default,
    /// The global fallback for categories found nowhere else
    Global,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_rejects_negative_factor() {
        let err = EmissionFactor::new(Category::Food, dec!(-0.1), "bad").unwrap_err();
        assert_eq!(err.field(), Some("factor"));
    }

    #[test]
    fn test_zero_factor_is_allowed() {
        let factor = EmissionFactor::new(Category::Green, Decimal::ZERO, "Eco-friendly purchases").unwrap();
        assert_eq!(factor.factor, Decimal::ZERO);
    }

    #[test]
    fn test_auto_description() {
        let category = Category::parse("new_category").unwrap();
        assert_eq!(
            EmissionFactor::auto_description(&category),
            "Auto-generated factor for NEW_CATEGORY"
        );
    }
}

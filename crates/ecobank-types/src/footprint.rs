//! Footprint values
//!
//! A footprint is the estimated CO2e (grams) attributed to one transaction.
//! It is always non-negative and always carries exactly two decimal digits,
//! rounded half away from zero.

use crate::{CarbonError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits kept on every footprint
pub const FOOTPRINT_SCALE: u32 = 2;

/// Non-negative footprint at scale 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct FootprintValue(Decimal);

impl FootprintValue {
    /// Zero footprint (`0.00`)
    pub fn zero() -> Self {
        Self(Decimal::new(0, FOOTPRINT_SCALE))
    }

    /// Round a raw `amount × factor` product to a footprint.
    ///
    /// Ties at the third digit go away from zero (`16.665` becomes `16.67`).
    /// A product too large to carry two decimal digits is rejected on
    /// `amount`.
    pub fn round(raw: Decimal) -> Result<Self> {
        Self::rounded(raw, "amount")
    }

    fn rounded(raw: Decimal, field: &str) -> Result<Self> {
        if raw < Decimal::ZERO {
            return Err(CarbonError::invalid_input(
                "footprint",
                format!("must not be negative, got {}", raw),
            ));
        }
        if raw.is_zero() {
            return Ok(Self::zero());
        }

        let mut value = raw.round_dp_with_strategy(FOOTPRINT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(FOOTPRINT_SCALE);
        if value.scale() != FOOTPRINT_SCALE {
            return Err(CarbonError::invalid_input(
                field,
                format!("{} is too large to keep {} decimal digits", raw, FOOTPRINT_SCALE),
            ));
        }
        Ok(Self(value))
    }

    /// Wrap an already-computed footprint, e.g. one loaded from a store.
    ///
    /// The value must be non-negative and representable at scale 2 without
    /// rounding.
    pub fn try_new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(CarbonError::invalid_input(
                "footprint",
                format!("must not be negative, got {}", value),
            ));
        }
        if value.normalize().scale() > FOOTPRINT_SCALE {
            return Err(CarbonError::invalid_input(
                "footprint",
                format!("{} has more than {} decimal digits", value, FOOTPRINT_SCALE),
            ));
        }
        Self::rounded(value, "footprint")
    }

    /// The underlying decimal
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for FootprintValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for FootprintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for FootprintValue {
    type Error = CarbonError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::try_new(value)
    }
}

impl From<FootprintValue> for Decimal {
    fn from(value: FootprintValue) -> Self {
        value.0
    }
}

//! EcoBank Types - Canonical domain types for carbon accounting
//!
//! This crate contains the foundational types for EcoBank with zero
//! dependencies on other ecobank crates. It defines:
//!
//! - Identity types (OwnerId, TransactionId, FactorId)
//! - Spending categories, normalized once at the boundary
//! - Emission factors and footprint values
//! - Transaction records as supplied by an external store
//! - Report shapes (stats, category breakdown, monthly history)
//!
//! # Numeric Invariants
//!
//! 1. Every amount, factor, footprint and ratio is an exact `Decimal`
//! 2. Footprints are non-negative and carry exactly 2 decimal digits
//! 3. Eco-scores are one of 0, 25, 50, 75, 100

pub mod identity;
pub mod category;
pub mod factor;
pub mod footprint;
pub mod transaction;
pub mod report;
pub mod error;

pub use identity::*;
pub use category::*;
pub use factor::*;
pub use footprint::*;
pub use transaction::*;
pub use report::*;
pub use error::*;

/// Version of the EcoBank types schema
pub const TYPES_VERSION: &str = "0.1.0";

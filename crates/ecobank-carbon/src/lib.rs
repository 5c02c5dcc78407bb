//! EcoBank Carbon Engine
//!
//! Derives a carbon-emissions accounting from spending transactions.
//!
//! # Components
//!
//! - **EmissionFactorTable**: category → grams CO2e per currency unit, with
//!   stored overrides over a built-in reference table
//! - **FootprintCalculator**: amount × factor, rounded half away from zero
//!   at 2 decimals
//! - **CarbonAggregator**: totals, calendar-month windows, category groups
//! - **EcoScoreEngine**: budget utilization → banded score
//! - **StatsAssembler**: composes the two report shapes
//! - **CarbonService**: the boundary resolvers and controllers call
//!
//! # Policy
//!
//! | Utilization ratio | Eco-score |
//! |-------------------|-----------|
//! | ≤ 0.50            | 100       |
//! | (0.50, 0.75]      | 75        |
//! | (0.75, 1.00]      | 50        |
//! | (1.00, 1.25]      | 25        |
//! | > 1.25            | 0         |
//!
//! A non-positive budget always scores 100.
//!
//! # Example
//!
//! ```ignore
//! use ecobank_carbon::CarbonService;
//!
//! let service = CarbonService::start(config, factors, transactions, budgets).await?;
//! let footprint = service.compute_footprint(dec!(33.33), Some("food"))?;
//! assert_eq!(footprint.to_string(), "16.67");
//! ```

pub mod aggregate;
pub mod config;
pub mod factors;
pub mod footprint;
pub mod score;
pub mod service;
pub mod stats;
pub mod store;

pub use aggregate::{CarbonAggregator, CategoryTotals, YearMonth};
pub use crate::config::{CarbonConfig, ConfigError, EngineConfig, LoggingConfig};
pub use factors::{reference_factor, EmissionFactorTable, ResolvedFactor, GLOBAL_DEFAULT_FACTOR};
pub use footprint::{FootprintCalculation, FootprintCalculator, SPEND_BASED_METHOD};
pub use score::{EcoScoreEngine, ScoreOutcome};
pub use service::CarbonService;
pub use stats::StatsAssembler;
pub use store::{
    BudgetSource, FactorStore, InMemoryBudgetSource, InMemoryFactorStore,
    InMemoryTransactionSource, TransactionSource,
};

pub use ecobank_types::{
    CarbonError, CarbonStatsReport, Category, CategoryBreakdownEntry, EcoScore, EmissionFactor,
    FactorSource, FootprintValue, MonthlyFootprint, OwnerId, Result, TransactionEdit,
    TransactionId, TransactionRecord,
};

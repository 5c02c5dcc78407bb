//! Engine Configuration
//!
//! Loaded from, in increasing priority: `config/default`, `config/local`,
//! an explicit file, then `ECOBANK__*` environment variables (after a
//! `.env` file, if present, has been applied).
//!
//! ```toml
//! [engine]
//! global_default_factor = 0.5
//! default_monthly_budget = 100000
//! history_months = 12
//! seed_defaults = true
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarbonConfig {
    /// Scoring and factor policy
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Factor for categories with neither a stored nor a reference factor
    #[serde(default = "default_global_factor")]
    pub global_default_factor: Decimal,

    /// Budget (grams CO2e) for owners without one of their own
    #[serde(default = "default_monthly_budget")]
    pub default_monthly_budget: Decimal,

    /// Months returned by the history report
    #[serde(default = "default_history_months")]
    pub history_months: usize,

    /// Persist the reference factor table on first start
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_default_factor: default_global_factor(),
            default_monthly_budget: default_monthly_budget(),
            history_months: default_history_months(),
            seed_defaults: true,
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global_default_factor < Decimal::ZERO {
            return Err(ConfigError::invalid(
                "engine.global_default_factor",
                format!("must not be negative, got {}", self.global_default_factor),
            ));
        }
        if self.default_monthly_budget <= Decimal::ZERO {
            return Err(ConfigError::invalid(
                "engine.default_monthly_budget",
                format!("must be positive, got {}", self.default_monthly_budget),
            ));
        }
        if self.history_months == 0 {
            return Err(ConfigError::invalid(
                "engine.history_months",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_global_factor() -> Decimal {
    dec!(0.5)
}

fn default_monthly_budget() -> Decimal {
    dec!(100000)
}

fn default_history_months() -> usize {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl CarbonConfig {
    /// Load configuration from files and environment, then validate it
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ECOBANK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: CarbonConfig = builder.build()?.try_deserialize()?;
        loaded.engine.validate()?;
        Ok(loaded)
    }
}

//! EcoBank CLI - carbon footprints and eco-scores from the command line
//!
//! Runs the carbon engine over a JSON transaction file.
//!
//! # Quick Start
//!
//! ```bash
//! ecobank footprint --amount 33.33 --category food
//! ecobank stats --file transactions.json --owner 0a6f6d7c-5a4f-4c3e-8f3a-7d4f7b1a2c33
//! ecobank --factor transport=3.1 breakdown --file transactions.json --owner owner_0a6f...
//! ecobank history --file transactions.json --owner ... --months 6 --at 2025-06-30T00:00:00Z
//! ecobank factors
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecobank_carbon::{
    CarbonConfig, CarbonService, EmissionFactorTable, FootprintCalculator, InMemoryBudgetSource,
    InMemoryFactorStore, InMemoryTransactionSource, LoggingConfig, OwnerId, TransactionSource,
};

mod commands;
mod display;
mod source;

use commands::{breakdown, factors, footprint, history, stats};
use source::JsonFileTransactionSource;

/// EcoBank CLI - carbon accounting for spending transactions
#[derive(Parser, Debug)]
#[command(name = "ecobank")]
#[command(author = "EcoBank Contributors")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, global = true, env = "ECOBANK_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ECOBANK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, global = true, env = "ECOBANK_LOG_FORMAT")]
    log_format: Option<String>,

    /// Override a factor before running, as CODE=VALUE (repeatable)
    #[arg(long = "factor", global = true, value_parser = parse_factor_override)]
    factors: Vec<FactorOverride>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the footprint of a single purchase
    Footprint {
        /// Amount spent
        #[arg(short, long)]
        amount: Decimal,

        /// Spending category (case-insensitive)
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Show totals, budget utilization and eco-score
    Stats {
        /// JSON transaction file
        #[arg(short, long)]
        file: PathBuf,

        /// Owner ID (with or without the owner_ prefix)
        #[arg(short, long, value_parser = parse_owner)]
        owner: OwnerId,

        /// Monthly budget in grams CO2e (defaults to the configured budget)
        #[arg(short, long)]
        budget: Option<Decimal>,

        /// Reference instant (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Show emissions grouped by category
    Breakdown {
        /// JSON transaction file
        #[arg(short, long)]
        file: PathBuf,

        /// Owner ID
        #[arg(short, long, value_parser = parse_owner)]
        owner: OwnerId,
    },

    /// Show the monthly footprint series, oldest first
    History {
        /// JSON transaction file
        #[arg(short, long)]
        file: PathBuf,

        /// Owner ID
        #[arg(short, long, value_parser = parse_owner)]
        owner: OwnerId,

        /// Number of months (defaults to the configured length)
        #[arg(short, long)]
        months: Option<usize>,

        /// Reference instant (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// List the effective emission factor table
    Factors,
}

impl Commands {
    fn transaction_file(&self) -> Option<&PathBuf> {
        match self {
            Commands::Stats { file, .. }
            | Commands::Breakdown { file, .. }
            | Commands::History { file, .. } => Some(file),
            Commands::Footprint { .. } | Commands::Factors => None,
        }
    }
}

/// A `--factor CODE=VALUE` override
#[derive(Debug, Clone, PartialEq)]
struct FactorOverride {
    category: String,
    factor: Decimal,
}

fn parse_factor_override(raw: &str) -> Result<FactorOverride, String> {
    let (category, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=VALUE, got '{}'", raw))?;
    let factor = Decimal::from_str(value.trim())
        .map_err(|e| format!("invalid factor '{}': {}", value, e))?;
    Ok(FactorOverride {
        category: category.to_string(),
        factor,
    })
}

fn parse_owner(raw: &str) -> Result<OwnerId, String> {
    OwnerId::parse(raw).map_err(|e| format!("invalid owner id '{}': {}", raw, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CarbonConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    init_logging(&config.logging)?;

    let factor_table = Arc::new(
        EmissionFactorTable::open(Arc::new(InMemoryFactorStore::new()), &config.engine)
            .await
            .context("Failed to open emission factor table")?,
    );

    let transactions: Arc<dyn TransactionSource> = match cli.command.transaction_file() {
        Some(path) => Arc::new(JsonFileTransactionSource::new(
            path.clone(),
            FootprintCalculator::new(factor_table.clone()),
        )),
        None => Arc::new(InMemoryTransactionSource::new()),
    };
    let budgets = Arc::new(InMemoryBudgetSource::new());
    let service = CarbonService::with_factors(
        config.engine.clone(),
        factor_table,
        transactions,
        budgets.clone(),
    );

    for FactorOverride { category, factor } in &cli.factors {
        let row = service
            .upsert_factor(category, *factor)
            .await
            .with_context(|| format!("Failed to apply --factor {}={}", category, factor))?;
        if !cli.json {
            display::success(&format!("{} set to {}", row.category, row.factor));
        }
    }

    tracing::debug!(command = ?cli.command, "Running command");

    match cli.command {
        Commands::Footprint { amount, category } => {
            footprint::run(&service, amount, category.as_deref(), cli.json)?;
        }
        Commands::Stats {
            owner, budget, at, ..
        } => {
            let now = commands::reference_instant(at.as_deref())?;
            if let Some(budget) = budget {
                budgets.set_budget(owner, budget).await;
            }
            stats::run(&service, owner, &now, cli.json).await?;
        }
        Commands::Breakdown { owner, .. } => {
            breakdown::run(&service, owner, cli.json).await?;
        }
        Commands::History {
            owner, months, at, ..
        } => {
            let now = commands::reference_instant(at.as_deref())?;
            history::run(&service, owner, &now, months, cli.json).await?;
        }
        Commands::Factors => {
            factors::run(&service, cli.json)?;
        }
    }

    Ok(())
}

/// Initialize tracing/logging. Logs go to stderr so reports stay pipeable.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.is_json() {
        subscriber
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    } else {
        subscriber
            .with(fmt::layer().pretty().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

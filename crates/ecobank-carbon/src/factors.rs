//! Emission factor table
//!
//! Resolution order for a category:
//!
//! 1. an explicitly stored row (seeded or set by an administrator)
//! 2. the built-in reference table below
//! 3. the global default factor
//!
//! | Category      | g CO2e / unit | Description              |
//! |---------------|---------------|--------------------------|
//! | FOOD          | 0.5           | Food and dining          |
//! | TRANSPORT     | 2.3           | Transportation and fuel  |
//! | SHOPPING      | 1.2           | General shopping         |
//! | ENERGY        | 0.8           | Electricity and gas      |
//! | SERVICES      | 0.3           | Services                 |
//! | ENTERTAINMENT | 0.4           | Entertainment            |
//! | TRAVEL        | 3.5           | Flights and hotels       |
//! | HEALTHCARE    | 0.2           | Medical services         |
//! | EDUCATION     | 0.1           | Education                |
//! | TECHNOLOGY    | 0.6           | Electronics and software |
//! | FASHION       | 1.5           | Clothing and accessories |
//! | HOME          | 0.7           | Home improvement         |
//! | GREEN         | 0.0           | Eco-friendly purchases   |
//! | OTHER         | 0.5           | Miscellaneous            |

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use ecobank_types::{
    validate_factor, CarbonError, Category, EmissionFactor, FactorSource, Result,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::store::FactorStore;

/// Global fallback factor of the reference policy
pub const GLOBAL_DEFAULT_FACTOR: Decimal = dec!(0.5);

/// Reference factor and description for one of the known categories
pub fn reference_factor(category: &Category) -> Option<(Decimal, &'static str)> {
    let entry = match category {
        Category::Food => (dec!(0.5), "Food and dining"),
        Category::Transport => (dec!(2.3), "Transportation and fuel"),
        Category::Shopping => (dec!(1.2), "General shopping"),
        Category::Energy => (dec!(0.8), "Electricity and gas"),
        Category::Services => (dec!(0.3), "Services"),
        Category::Entertainment => (dec!(0.4), "Entertainment"),
        Category::Travel => (dec!(3.5), "Flights and hotels"),
        Category::Healthcare => (dec!(0.2), "Medical services"),
        Category::Education => (dec!(0.1), "Education"),
        Category::Technology => (dec!(0.6), "Electronics and software"),
        Category::Fashion => (dec!(1.5), "Clothing and accessories"),
        Category::Home => (dec!(0.7), "Home improvement"),
        Category::Green => (dec!(0.0), "Eco-friendly purchases"),
        Category::Other => (dec!(0.5), "Miscellaneous"),
        Category::Custom(_) => return None,
    };
    Some(entry)
}

/// A factor together with where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFactor {
    pub category: Category,
    pub factor: Decimal,
    pub description: String,
    pub source: FactorSource,
}

/// Category → factor table with stored overrides.
///
/// Reads are served from an in-process cache of the stored rows, so
/// [`resolve`](Self::resolve) is synchronous and never fails. Writes go to
/// the store first and then to the cache, one at a time.
pub struct EmissionFactorTable {
    store: Arc<dyn FactorStore>,
    /// Stored rows keyed by normalized category
    stored: RwLock<HashMap<Category, EmissionFactor>>,
    /// Serializes upserts and seeding
    write_lock: Mutex<()>,
    global_default: Decimal,
}

impl EmissionFactorTable {
    /// Create a table over a store. The cache starts empty; call
    /// [`hydrate`](Self::hydrate) or [`seed_defaults`](Self::seed_defaults).
    pub fn new(store: Arc<dyn FactorStore>, global_default: Decimal) -> Result<Self> {
        if global_default < Decimal::ZERO {
            return Err(CarbonError::invalid_input(
                "global_default_factor",
                format!("must not be negative, got {}", global_default),
            ));
        }

        Ok(Self {
            store,
            stored: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
            global_default,
        })
    }

    /// Create a table from engine settings, seeding the store if configured
    /// and loading every stored row.
    pub async fn open(store: Arc<dyn FactorStore>, config: &EngineConfig) -> Result<Self> {
        let table = Self::new(store, config.global_default_factor)?;
        if config.seed_defaults {
            table.seed_defaults().await?;
        }
        let stored = table.hydrate().await?;
        info!(stored_factors = stored, "Emission factor table opened");
        Ok(table)
    }

    /// Global fallback factor
    pub fn global_default(&self) -> Decimal {
        self.global_default
    }

    /// Reload the cache from the store. Returns the number of stored rows.
    pub async fn hydrate(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let rows = self.store.load_all().await?;
        let count = rows.len();

        let mut stored = self.stored.write();
        stored.clear();
        for row in rows {
            stored.insert(row.category.clone(), row);
        }

        debug!(rows = count, "Emission factor cache hydrated");
        Ok(count)
    }

    /// Persist the reference table when the store holds no rows yet.
    ///
    /// Returns the number of rows seeded, zero if the store was not empty.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        if !self.store.load_all().await?.is_empty() {
            return Ok(0);
        }

        let mut seeded = Vec::with_capacity(Category::KNOWN.len());
        for category in Category::KNOWN.iter() {
            if let Some((factor, description)) = reference_factor(category) {
                let row = EmissionFactor::new(category.clone(), factor, description)?;
                self.store.persist_factor(&row).await?;
                seeded.push(row);
            }
        }

        let count = seeded.len();
        let mut stored = self.stored.write();
        for row in seeded {
            stored.insert(row.category.clone(), row);
        }

        info!(count, "Seeded carbon factors");
        Ok(count)
    }

    /// Factor for a category. Never fails.
    pub fn resolve(&self, category: &Category) -> Decimal {
        self.resolve_detailed(category).factor
    }

    /// Factor for a caller-supplied category string.
    ///
    /// The string is normalized first; a code that cannot be normalized
    /// resolves to the global default like any other unknown category.
    pub fn resolve_str(&self, raw: &str) -> Decimal {
        match Category::parse(raw) {
            Ok(category) => self.resolve(&category),
            Err(_) => self.global_default,
        }
    }

    /// Factor for a category with its provenance
    pub fn resolve_detailed(&self, category: &Category) -> ResolvedFactor {
        if let Some(row) = self.stored.read().get(category) {
            return ResolvedFactor {
                category: category.clone(),
                factor: row.factor,
                description: row.description.clone(),
                source: FactorSource::Stored,
            };
        }

        match reference_factor(category) {
            Some((factor, description)) => ResolvedFactor {
                category: category.clone(),
                factor,
                description: description.to_string(),
                source: FactorSource::Default,
            },
            None => ResolvedFactor {
                category: category.clone(),
                factor: self.global_default,
                description: String::new(),
                source: FactorSource::Global,
            },
        }
    }

    /// The stored row for a category, for callers that require one to exist
    pub fn get(&self, category: &Category) -> Result<EmissionFactor> {
        self.stored
            .read()
            .get(category)
            .cloned()
            .ok_or_else(|| CarbonError::not_found("emission factor", category.code()))
    }

    /// Create or overwrite the factor for a category.
    ///
    /// An existing row keeps its identity and description; only the value and
    /// timestamp change. Authorization is the caller's concern.
    pub async fn upsert(&self, raw_category: &str, factor: Decimal) -> Result<EmissionFactor> {
        let category = Category::parse(raw_category)?;
        validate_factor(factor)?;

        let _guard = self.write_lock.lock().await;
        let row = match self.store.load_factor(&category).await? {
            Some(mut existing) => {
                existing.factor = factor;
                existing.updated_at = Utc::now();
                existing
            }
            None => {
                let description = reference_factor(&category)
                    .map(|(_, description)| description.to_string())
                    .unwrap_or_else(|| EmissionFactor::auto_description(&category));
                EmissionFactor::new(category.clone(), factor, description)?
            }
        };

        self.store.persist_factor(&row).await?;
        self.stored.write().insert(category.clone(), row.clone());

        info!(category = %category, factor = %factor, factor_id = %row.id, "Emission factor upserted");
        Ok(row)
    }

    /// The effective table: every known category plus any stored custom
    /// codes, ordered by code
    pub fn list(&self) -> Vec<ResolvedFactor> {
        let mut categories: Vec<Category> = Category::KNOWN.to_vec();
        categories.extend(
            self.stored
                .read()
                .keys()
                .filter(|category| !category.is_known())
                .cloned(),
        );

        let mut resolved: Vec<ResolvedFactor> =
            categories.iter().map(|c| self.resolve_detailed(c)).collect();
        resolved.sort_by(|a, b| a.category.code().cmp(b.category.code()));
        resolved
    }
}

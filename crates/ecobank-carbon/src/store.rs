//! Collaborator contracts
//!
//! The engine does not persist anything itself. It reads transactions and
//! budgets from the surrounding application and keeps factor overrides
//! durable through a [`FactorStore`]. Implementations report their own
//! failures as `CarbonError::DependencyFailure`.

use std::collections::HashMap;

use async_trait::async_trait;
use ecobank_types::{Category, EmissionFactor, OwnerId, Result, TransactionRecord};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

/// Read-only access to an owner's transactions
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch every transaction belonging to the owner
    async fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>>;
}

/// Read-only access to an owner's configured monthly budget
#[async_trait]
pub trait BudgetSource: Send + Sync {
    /// The owner's monthly budget in grams CO2e, `None` when unset
    async fn fetch_budget(&self, owner: &OwnerId) -> Result<Option<Decimal>>;
}

/// Durable storage for emission factor rows
#[async_trait]
pub trait FactorStore: Send + Sync {
    /// Insert or replace the row for `factor.category`
    async fn persist_factor(&self, factor: &EmissionFactor) -> Result<()>;

    /// Load the row for a normalized category
    async fn load_factor(&self, category: &Category) -> Result<Option<EmissionFactor>>;

    /// Load every stored row
    async fn load_all(&self) -> Result<Vec<EmissionFactor>>;
}

/// In-memory transaction source for testing and file-backed tools
#[derive(Default)]
pub struct InMemoryTransactionSource {
    records: RwLock<HashMap<OwnerId, Vec<TransactionRecord>>>,
}

impl InMemoryTransactionSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-loaded with records
    pub fn with_records(records: impl IntoIterator<Item = TransactionRecord>) -> Self {
        let mut by_owner: HashMap<OwnerId, Vec<TransactionRecord>> = HashMap::new();
        for record in records {
            by_owner.entry(record.owner_id).or_default().push(record);
        }
        Self {
            records: RwLock::new(by_owner),
        }
    }

    /// Insert a record, replacing any record with the same id
    pub async fn upsert(&self, record: TransactionRecord) {
        let mut records = self.records.write().await;
        let owned = records.entry(record.owner_id).or_default();
        match owned.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => owned.push(record),
        }
    }
}

#[async_trait]
impl TransactionSource for InMemoryTransactionSource {
    async fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.read().await.get(owner).cloned().unwrap_or_default())
    }
}

/// In-memory budget source
#[derive(Default)]
pub struct InMemoryBudgetSource {
    budgets: RwLock<HashMap<OwnerId, Decimal>>,
}

impl InMemoryBudgetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an owner's budget
    pub async fn set_budget(&self, owner: OwnerId, budget: Decimal) {
        self.budgets.write().await.insert(owner, budget);
    }

    /// Clear an owner's budget back to unset
    pub async fn clear_budget(&self, owner: &OwnerId) {
        self.budgets.write().await.remove(owner);
    }
}

#[async_trait]
impl BudgetSource for InMemoryBudgetSource {
    async fn fetch_budget(&self, owner: &OwnerId) -> Result<Option<Decimal>> {
        Ok(self.budgets.read().await.get(owner).copied())
    }
}

/// In-memory factor store
#[derive(Default)]
pub struct InMemoryFactorStore {
    factors: RwLock<HashMap<Category, EmissionFactor>>,
}

impl InMemoryFactorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.factors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.factors.read().await.is_empty()
    }
}

#[async_trait]
impl FactorStore for InMemoryFactorStore {
    async fn persist_factor(&self, factor: &EmissionFactor) -> Result<()> {
        self.factors
            .write()
            .await
            .insert(factor.category.clone(), factor.clone());
        Ok(())
    }

    async fn load_factor(&self, category: &Category) -> Result<Option<EmissionFactor>> {
        Ok(self.factors.read().await.get(category).cloned())
    }

    async fn load_all(&self) -> Result<Vec<EmissionFactor>> {
        let mut all: Vec<EmissionFactor> = self.factors.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.category.code().cmp(b.category.code()));
        Ok(all)
    }
}

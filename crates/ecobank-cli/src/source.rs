//! JSON file transaction source
//!
//! The file holds a JSON array of transactions. Records without a stored
//! footprint are priced with the shared factor table when they are read.
//!
//! ```json
//! [
//!   {
//!     "owner_id": "0a6f6d7c-5a4f-4c3e-8f3a-7d4f7b1a2c33",
//!     "amount": "42.50",
//!     "category": "food",
//!     "occurred_at": "2025-06-10T08:00:00Z"
//!   }
//! ]
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecobank_carbon::{
    CarbonError, Category, FootprintCalculator, FootprintValue, OwnerId, Result, TransactionId,
    TransactionRecord, TransactionSource,
};
use rust_decimal::Decimal;
use serde::Deserialize;

const DEPENDENCY: &str = "transaction_file";

/// One transaction as written in the file
#[derive(Debug, Deserialize)]
struct TransactionLine {
    #[serde(default)]
    id: Option<TransactionId>,
    owner_id: OwnerId,
    amount: Decimal,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    footprint: Option<FootprintValue>,
    occurred_at: DateTime<Utc>,
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Reads transactions from a JSON file on every fetch
pub struct JsonFileTransactionSource {
    path: PathBuf,
    calculator: FootprintCalculator,
}

impl JsonFileTransactionSource {
    pub fn new(path: impl Into<PathBuf>, calculator: FootprintCalculator) -> Self {
        Self {
            path: path.into(),
            calculator,
        }
    }

    fn to_record(&self, index: usize, line: TransactionLine) -> Result<TransactionRecord> {
        let category = match line.category.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(Category::parse(raw).map_err(|e| {
                CarbonError::dependency(DEPENDENCY, format!("record {}: {}", index, e))
            })?),
            _ => None,
        };

        let footprint = match line.footprint {
            Some(footprint) => footprint,
            None => self
                .calculator
                .compute(line.amount, category.as_ref().unwrap_or(&Category::fallback()))
                .map_err(|e| CarbonError::dependency(DEPENDENCY, format!("record {}: {}", index, e)))?,
        };

        Ok(TransactionRecord {
            id: line.id.unwrap_or_default(),
            owner_id: line.owner_id,
            amount: line.amount,
            category,
            footprint,
            occurred_at: line.occurred_at,
            merchant: line.merchant,
            description: line.description,
            location: line.location,
        })
    }
}

#[async_trait]
impl TransactionSource for JsonFileTransactionSource {
    async fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<TransactionRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CarbonError::dependency(DEPENDENCY, format!("{}: {}", self.path.display(), e))
        })?;
        let lines: Vec<TransactionLine> = serde_json::from_str(&contents).map_err(|e| {
            CarbonError::dependency(DEPENDENCY, format!("{}: {}", self.path.display(), e))
        })?;

        lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| &line.owner_id == owner)
            .map(|(index, line)| self.to_record(index, line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecobank_carbon::{EmissionFactorTable, InMemoryFactorStore, GLOBAL_DEFAULT_FACTOR};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    const OWNER: &str = "0a6f6d7c-5a4f-4c3e-8f3a-7d4f7b1a2c33";

    fn calculator() -> FootprintCalculator {
        let table = EmissionFactorTable::new(Arc::new(InMemoryFactorStore::new()), GLOBAL_DEFAULT_FACTOR).unwrap();
        FootprintCalculator::new(Arc::new(table))
    }

    fn write_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ecobank-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_prices_records_without_footprint() {
        let path = write_file(
            "priced",
            &format!(
                r#"[
                    {{"owner_id": "{owner}", "amount": "100", "category": "food", "occurred_at": "2025-06-10T08:00:00Z"}},
                    {{"owner_id": "{owner}", "amount": "10", "footprint": "1.25", "occurred_at": "2025-06-11T08:00:00Z"}},
                    {{"owner_id": "6f1c1c1e-8d3b-4c43-9b8e-0d6f3f7a0b11", "amount": "5", "occurred_at": "2025-06-11T08:00:00Z"}}
                ]"#,
                owner = OWNER
            ),
        );
        let source = JsonFileTransactionSource::new(&path, calculator());
        let owner = OwnerId::parse(OWNER).unwrap();

        let records = source.fetch_transactions(&owner).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Some(Category::Food));
        assert_eq!(records[0].footprint.value(), dec!(50.00));
        assert_eq!(records[1].category, None);
        assert_eq!(records[1].footprint.value(), dec!(1.25));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_dependency_failure() {
        let source = JsonFileTransactionSource::new("/nonexistent/ecobank.json", calculator());
        let err = source.fetch_transactions(&OwnerId::new()).await.unwrap_err();
        assert_eq!(err.error_code(), "DEPENDENCY_FAILURE");
    }

    #[tokio::test]
    async fn test_malformed_file_is_dependency_failure() {
        let path = write_file("malformed", "{ not json");
        let source = JsonFileTransactionSource::new(&path, calculator());
        let err = source.fetch_transactions(&OwnerId::new()).await.unwrap_err();
        assert!(err.is_retriable());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_bad_category_names_the_record() {
        let path = write_file(
            "category",
            &format!(
                r#"[{{"owner_id": "{}", "amount": "1", "category": "fo$od", "occurred_at": "2025-06-10T08:00:00Z"}}]"#,
                OWNER
            ),
        );
        let source = JsonFileTransactionSource::new(&path, calculator());
        let err = source
            .fetch_transactions(&OwnerId::parse(OWNER).unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("record 0"));

        std::fs::remove_file(&path).unwrap();
    }
}

//! Transaction records
//!
//! Records are owned by an external transaction store. The engine reads
//! amount, category and timestamp and derives the footprint; it never edits
//! a record in place.

use crate::{Category, FootprintValue, OwnerId, TransactionId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A spending transaction together with its derived footprint.
///
/// Amount, category and footprint always travel in one value, so a reader
/// sees either the pre-edit or the post-edit triple, never a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub owner_id: OwnerId,
    /// Amount spent, never negative
    pub amount: Decimal,
    /// Normalized category; `None` is grouped under the fallback bucket
    #[serde(default)]
    pub category: Option<Category>,
    /// Footprint derived from amount and category
    #[serde(default)]
    pub footprint: FootprintValue,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl TransactionRecord {
    /// Category used for grouping, with unset categories mapped to the fallback
    pub fn category_or_fallback(&self) -> Category {
        self.category.clone().unwrap_or_else(Category::fallback)
    }
}

/// A partial update to a transaction.
///
/// Only amount and category feed the footprint; the descriptive fields can
/// change freely without a recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEdit {
    pub amount: Option<Decimal>,
    pub category: Option<Category>,
    pub merchant: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl TransactionEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// True when the edit supplies an amount or a category
    pub fn touches_footprint(&self) -> bool {
        self.amount.is_some() || self.category.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_descriptive_edits_do_not_touch_footprint() {
        let edit = TransactionEdit::new()
            .with_description("lunch")
            .with_location("Lyon")
            .with_merchant("Bistro");
        assert!(!edit.touches_footprint());

        assert!(TransactionEdit::new().with_amount(dec!(1)).touches_footprint());
        assert!(TransactionEdit::new().with_category(Category::Food).touches_footprint());
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "tx_6f1c1c1e-8d3b-4c43-9b8e-0d6f3f7a0b11",
            "owner_id": "owner_0a6f6d7c-5a4f-4c3e-8f3a-7d4f7b1a2c33",
            "amount": "12.50",
            "occurred_at": "2026-03-04T10:00:00Z"
        }"#;
        let record: Result<TransactionRecord, _> = serde_json::from_str(json);
        // prefixed ids are a display format only; the wire format is the bare uuid
        assert!(record.is_err());

        let json = r#"{
            "id": "6f1c1c1e-8d3b-4c43-9b8e-0d6f3f7a0b11",
            "owner_id": "0a6f6d7c-5a4f-4c3e-8f3a-7d4f7b1a2c33",
            "amount": "12.50",
            "occurred_at": "2026-03-04T10:00:00Z"
        }"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.amount, dec!(12.50));
        assert_eq!(record.category, None);
        assert_eq!(record.category_or_fallback(), Category::Other);
        assert!(record.footprint.is_zero());
    }
}

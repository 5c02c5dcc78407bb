//! End-to-end tests through the service boundary

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use ecobank_carbon::{
    BudgetSource, CarbonError, CarbonService, Category, EcoScore, EngineConfig, FactorSource,
    FootprintValue, InMemoryBudgetSource, InMemoryFactorStore, InMemoryTransactionSource,
    OwnerId, Result, TransactionEdit, TransactionId, TransactionRecord, TransactionSource,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Harness {
    service: CarbonService,
    transactions: Arc<InMemoryTransactionSource>,
    budgets: Arc<InMemoryBudgetSource>,
    factor_store: Arc<InMemoryFactorStore>,
}

async fn harness() -> Harness {
    let transactions = Arc::new(InMemoryTransactionSource::new());
    let budgets = Arc::new(InMemoryBudgetSource::new());
    let factor_store = Arc::new(InMemoryFactorStore::new());
    let service = CarbonService::start(
        EngineConfig::default(),
        factor_store.clone(),
        transactions.clone(),
        budgets.clone(),
    )
    .await
    .unwrap();

    Harness {
        service,
        transactions,
        budgets,
        factor_store,
    }
}

fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

async fn record(
    service: &CarbonService,
    owner: OwnerId,
    amount: Decimal,
    category: &str,
    occurred_at: &str,
) -> TransactionRecord {
    let footprint = service.compute_footprint(amount, Some(category)).unwrap();
    TransactionRecord {
        id: TransactionId::new(),
        owner_id: owner,
        amount,
        category: Some(Category::parse(category).unwrap()),
        footprint,
        occurred_at: at(occurred_at).with_timezone(&Utc),
        merchant: None,
        description: None,
        location: None,
    }
}

struct UnreachableTransactions;

#[async_trait]
impl TransactionSource for UnreachableTransactions {
    async fn fetch_transactions(&self, _owner: &OwnerId) -> Result<Vec<TransactionRecord>> {
        Err(CarbonError::dependency("transaction_source", "connection refused"))
    }
}

struct UnreachableBudgets;

#[async_trait]
impl BudgetSource for UnreachableBudgets {
    async fn fetch_budget(&self, _owner: &OwnerId) -> Result<Option<Decimal>> {
        Err(CarbonError::dependency("budget_source", "timeout"))
    }
}

#[tokio::test]
async fn test_owner_stats_use_stored_budget() {
    let h = harness().await;
    let owner = OwnerId::new();

    // 1000 × 2.3 = 2300 g this month, 100 × 3.5 = 350 g last month
    let current = record(&h.service, owner, dec!(1000), "transport", "2025-06-10T08:00:00Z").await;
    let previous = record(&h.service, owner, dec!(100), "travel", "2025-05-10T08:00:00Z").await;
    h.transactions.upsert(current).await;
    h.transactions.upsert(previous).await;
    h.budgets.set_budget(owner, dec!(4000)).await;

    let now = at("2025-06-20T12:00:00Z");
    let report = h.service.stats_for_owner(owner, &now).await.unwrap();
    assert_eq!(report.total_footprint, dec!(2650.00));
    assert_eq!(report.monthly_footprint, dec!(2300.00));
    assert_eq!(report.monthly_budget, dec!(4000));
    assert_eq!(report.utilization_ratio, Some(dec!(0.575)));
    assert_eq!(report.eco_score, EcoScore::Good);
}

#[tokio::test]
async fn test_unset_budget_falls_back_to_configured_default() {
    let h = harness().await;
    let owner = OwnerId::new();
    let tx = record(&h.service, owner, dec!(100000), "food", "2025-06-10T08:00:00Z").await;
    h.transactions.upsert(tx).await;

    let now = at("2025-06-20T12:00:00Z");
    let report = h.service.stats_for_owner(owner, &now).await.unwrap();
    assert_eq!(report.monthly_budget, dec!(100000));
    assert_eq!(report.monthly_footprint, dec!(50000.00));
    assert_eq!(report.eco_score, EcoScore::Excellent);
    assert_eq!(h.service.refresh_eco_score(owner, &now).await.unwrap().value(), 100);
}

#[tokio::test]
async fn test_caller_budget_overrides_owner_budget() {
    let h = harness().await;
    let owner = OwnerId::new();
    h.budgets.set_budget(owner, dec!(1)).await;
    let records = vec![record(&h.service, owner, dec!(150), "food", "2025-06-10T08:00:00Z").await];

    let now = at("2025-06-20T12:00:00Z");
    let report = h
        .service
        .get_stats(owner, &records, Some(dec!(100)), &now)
        .await
        .unwrap();
    assert_eq!(report.utilization_ratio, Some(dec!(0.75)));
    assert_eq!(report.eco_score, EcoScore::Good);
}

#[tokio::test]
async fn test_breakdown_and_history_for_owner() {
    let h = harness().await;
    let owner = OwnerId::new();
    for (amount, category, when) in [
        (dec!(100), "food", "2025-06-01T00:00:00Z"),
        (dec!(100), "FOOD", "2025-04-15T00:00:00Z"),
        (dec!(10), "travel", "2025-06-02T00:00:00Z"),
    ] {
        let tx = record(&h.service, owner, amount, category, when).await;
        h.transactions.upsert(tx).await;
    }

    let breakdown = h.service.breakdown_for_owner(owner).await.unwrap();
    assert_eq!(breakdown.len(), 2);
    let food = breakdown.iter().find(|e| e.category == Category::Food).unwrap();
    assert_eq!(food.transaction_count, 2);
    assert_eq!(food.total_footprint, dec!(100.00));
    let shares: Decimal = breakdown.iter().map(|e| e.share_percent).sum();
    assert!((shares - dec!(100)).abs() <= dec!(0.1));

    let now = at("2025-06-30T23:00:00Z");
    let history = h.service.history_for_owner(owner, &now, None).await.unwrap();
    assert_eq!(history.len(), 12);
    let last = history.last().unwrap();
    assert_eq!((last.year, last.month), (2025, 6));
    assert_eq!(last.footprint, dec!(85.00));
    assert_eq!(history[9].footprint, dec!(50.00));
    assert!(history[10].footprint.is_zero());
}

#[tokio::test]
async fn test_upsert_then_compute_sees_new_factor() {
    let h = harness().await;
    let before = h.service.factors().get(&Category::Food).unwrap();

    let updated = h.service.upsert_factor("Food", dec!(0.8)).await.unwrap();
    assert_eq!(updated.id, before.id);
    assert_eq!(
        h.service.compute_footprint(dec!(100), Some("food")).unwrap().value(),
        dec!(80.00)
    );

    let stored = h.factor_store.len().await;
    assert_eq!(stored, 14);

    let custom = h.service.upsert_factor("crypto mining", dec!(9.5)).await.unwrap();
    assert_eq!(custom.category.code(), "CRYPTO_MINING");
    assert_eq!(h.factor_store.len().await, 15);
    let resolved = h.service.factors().resolve_detailed(&custom.category);
    assert_eq!(resolved.source, FactorSource::Stored);
}

#[tokio::test]
async fn test_restart_keeps_stored_factors() {
    let h = harness().await;
    h.service.upsert_factor("energy", dec!(1.4)).await.unwrap();

    let restarted = CarbonService::start(
        EngineConfig::default(),
        h.factor_store.clone(),
        h.transactions.clone(),
        h.budgets.clone(),
    )
    .await
    .unwrap();
    assert_eq!(restarted.factors().resolve(&Category::Energy), dec!(1.4));
    assert_eq!(h.factor_store.len().await, 14);
}

#[tokio::test]
async fn test_edit_keeps_record_consistent() {
    let h = harness().await;
    let owner = OwnerId::new();
    let tx = record(&h.service, owner, dec!(40), "shopping", "2025-06-10T08:00:00Z").await;
    assert_eq!(tx.footprint, FootprintValue::try_new(dec!(48.00)).unwrap());

    let renamed = h
        .service
        .apply_edit(&tx, &TransactionEdit::new().with_merchant("Corner shop"))
        .unwrap();
    assert_eq!(renamed.footprint, tx.footprint);

    let moved = h
        .service
        .apply_edit(&tx, &TransactionEdit::new().with_category(Category::Green))
        .unwrap();
    assert!(moved.footprint.is_zero());
    assert_eq!(moved.amount, dec!(40));
}

#[tokio::test]
async fn test_transactions_in_category() {
    let h = harness().await;
    let owner = OwnerId::new();
    let food = record(&h.service, owner, dec!(5), "food", "2025-06-10T08:00:00Z").await;
    let home = record(&h.service, owner, dec!(5), "home", "2025-06-10T08:00:00Z").await;
    let food_id = food.id;
    h.transactions.upsert(food).await;
    h.transactions.upsert(home).await;

    let found = h.service.transactions_in_category(owner, " Food ").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, food_id);

    let err = h.service.transactions_in_category(owner, "").await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

#[tokio::test]
async fn test_transaction_source_failure_is_propagated() {
    let service = CarbonService::start(
        EngineConfig::default(),
        Arc::new(InMemoryFactorStore::new()),
        Arc::new(UnreachableTransactions),
        Arc::new(InMemoryBudgetSource::new()),
    )
    .await
    .unwrap();
    let owner = OwnerId::new();
    let now = Utc::now().fixed_offset();

    let err = service.stats_for_owner(owner, &now).await.unwrap_err();
    assert_eq!(
        err,
        CarbonError::dependency("transaction_source", "connection refused")
    );
    assert!(err.is_retriable());
    assert!(service.breakdown_for_owner(owner).await.is_err());
    assert!(service.history_for_owner(owner, &now, None).await.is_err());
    assert!(service.refresh_eco_score(owner, &now).await.is_err());
}

#[tokio::test]
async fn test_budget_source_failure_is_propagated() {
    let service = CarbonService::start(
        EngineConfig::default(),
        Arc::new(InMemoryFactorStore::new()),
        Arc::new(InMemoryTransactionSource::new()),
        Arc::new(UnreachableBudgets),
    )
    .await
    .unwrap();
    let owner = OwnerId::new();
    let now = Utc::now().fixed_offset();

    let err = service.get_stats(owner, &[], None, &now).await.unwrap_err();
    assert_eq!(err.error_code(), "DEPENDENCY_FAILURE");

    // a caller-supplied budget never touches the budget source
    let report = service.get_stats(owner, &[], Some(dec!(10)), &now).await.unwrap();
    assert_eq!(report.eco_score, EcoScore::Excellent);
}

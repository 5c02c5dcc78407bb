//! Aggregation over footprint values
//!
//! Monthly windows are calendar months in the time zone of the reference
//! instant: a record belongs to the month of the reference if its timestamp,
//! seen in that zone, falls on or after the first day at 00:00 and strictly
//! before the first day of the following month.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use ecobank_types::{
    CarbonError, Category, FootprintValue, MonthlyFootprint, Result, TransactionRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing an instant, in the instant's own time zone
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn previous(&self) -> Self {
        self.back(1)
    }

    pub fn next(&self) -> Self {
        self.back(-1)
    }

    /// The month `n` months earlier (later for negative `n`)
    pub fn back(&self, n: i64) -> Self {
        let index = self.index() - n;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Like [`back`](Self::back), but `None` when the result has no
    /// calendar date
    pub fn checked_back(&self, n: i64) -> Option<Self> {
        let index = self.index().checked_sub(n)?;
        let month = Self {
            year: i32::try_from(index.div_euclid(12)).ok()?,
            month: index.rem_euclid(12) as u32 + 1,
        };
        month.first_day().map(|_| month)
    }

    fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// First calendar day of the month
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Whether a record's timestamp falls in this month, as seen in `tz`
    pub fn contains<Tz: TimeZone>(&self, record: &TransactionRecord, tz: &Tz) -> bool {
        Self::containing(&record.occurred_at.with_timezone(tz)) == *self
    }
}

/// Per-category totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub category: Category,
    pub total_footprint: Decimal,
    pub total_amount: Decimal,
    pub count: usize,
}

/// Sums footprints over record sets
#[derive(Debug, Clone)]
pub struct CarbonAggregator {
    fallback: Category,
}

impl Default for CarbonAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn zero_sum() -> Decimal {
    FootprintValue::zero().value()
}

fn checked_sum(field: &str, acc: Decimal, value: Decimal) -> Result<Decimal> {
    acc.checked_add(value).ok_or_else(|| {
        CarbonError::invalid_input(field, format!("sum exceeds {}", Decimal::MAX))
    })
}

fn sum_footprints<'a>(mut records: impl Iterator<Item = &'a TransactionRecord>) -> Result<Decimal> {
    records.try_fold(zero_sum(), |acc, r| checked_sum("footprint", acc, r.footprint.value()))
}

impl CarbonAggregator {
    pub fn new() -> Self {
        Self {
            fallback: Category::fallback(),
        }
    }

    /// Bucket for records without a category
    pub fn fallback(&self) -> &Category {
        &self.fallback
    }

    /// Sum of every footprint
    pub fn total_footprint(&self, records: &[TransactionRecord]) -> Result<Decimal> {
        sum_footprints(records.iter())
    }

    /// Sum of footprints in the calendar month containing `reference`
    pub fn monthly_footprint<Tz: TimeZone>(
        &self,
        records: &[TransactionRecord],
        reference: &DateTime<Tz>,
    ) -> Result<Decimal> {
        self.footprint_in(records, YearMonth::containing(reference), &reference.timezone())
    }

    /// Sum of footprints in one month, as seen in `tz`
    pub fn footprint_in<Tz: TimeZone>(
        &self,
        records: &[TransactionRecord],
        month: YearMonth,
        tz: &Tz,
    ) -> Result<Decimal> {
        sum_footprints(records.iter().filter(|r| month.contains(r, tz)))
    }

    /// One total per month for the `count` months ending with the month of
    /// `reference`, oldest first. Months without records report zero.
    ///
    /// A count reaching back past the earliest calendar date is rejected
    /// with `InvalidInput` on `months`.
    pub fn monthly_history<Tz: TimeZone>(
        &self,
        records: &[TransactionRecord],
        reference: &DateTime<Tz>,
        count: usize,
    ) -> Result<Vec<MonthlyFootprint>> {
        let tz = reference.timezone();
        let current = YearMonth::containing(reference);
        if count == 0 {
            return Ok(Vec::new());
        }

        let span = i64::try_from(count - 1)
            .ok()
            .filter(|&span| current.checked_back(span).is_some())
            .ok_or_else(|| {
                CarbonError::invalid_input(
                    "months",
                    format!("{} months reach back before the earliest calendar date", count),
                )
            })?;

        (0..=span)
            .rev()
            .map(|offset| {
                let month = current.back(offset);
                Ok(MonthlyFootprint {
                    year: month.year,
                    month: month.month,
                    footprint: self.footprint_in(records, month, &tz)?,
                })
            })
            .collect()
    }

    /// Totals per category in order of first appearance.
    ///
    /// Records without a category are grouped under the fallback bucket, so
    /// the group footprints always sum to [`total_footprint`](Self::total_footprint).
    pub fn by_category(&self, records: &[TransactionRecord]) -> Result<Vec<CategoryTotals>> {
        let mut groups: Vec<CategoryTotals> = Vec::new();

        for record in records {
            let category = record.category.as_ref().unwrap_or(&self.fallback);
            let index = match groups.iter().position(|g| &g.category == category) {
                Some(index) => index,
                None => {
                    groups.push(CategoryTotals {
                        category: category.clone(),
                        total_footprint: zero_sum(),
                        total_amount: Decimal::ZERO,
                        count: 0,
                    });
                    groups.len() - 1
                }
            };

            let group = &mut groups[index];
            group.total_footprint =
                checked_sum("footprint", group.total_footprint, record.footprint.value())?;
            group.total_amount = checked_sum("amount", group.total_amount, record.amount)?;
            group.count += 1;
        }

        Ok(groups)
    }

    /// Records in a category, with unset categories matching the fallback
    pub fn in_category<'a>(
        &self,
        records: &'a [TransactionRecord],
        category: &Category,
    ) -> Vec<&'a TransactionRecord> {
        records
            .iter()
            .filter(|r| r.category.as_ref().unwrap_or(&self.fallback) == category)
            .collect()
    }
}

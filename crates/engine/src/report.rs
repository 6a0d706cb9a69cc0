//! Aggregation from a ledger to report data.
//!
//! Reports are derived on every request and never cached; the ledger can
//! grow between two requests. Iteration order of the category breakdown is
//! deterministic (subtotal descending, first-seen order on ties) so that
//! rendered replies and exported files are reproducible.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{ExpenseRecord, MoneyCents};

/// Bucket name the preview folds redacted categories into.
pub const OTHER_BUCKET: &str = "other";

/// One category's subtotal within a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub subtotal: MoneyCents,
}

/// Summary of a user's ledger.
///
/// `is_full` tells the renderer whether `by_category` is the complete
/// breakdown or the redacted preview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BudgetReport {
    pub total_spent: MoneyCents,
    pub entry_count: usize,
    pub by_category: Vec<CategoryTotal>,
    pub is_full: bool,
}

/// Spending-pace figures derived from the ledger's time span.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BudgetSnapshot {
    pub avg_daily_spend: MoneyCents,
    pub suggested_daily_cap: MoneyCents,
    pub days_observed: i64,
}

/// Aggregates `records` into a [`BudgetReport`].
///
/// One pass over the ledger: sum the total, bucket per category in
/// first-seen order, count the entries. When `unlocked` is false the
/// breakdown keeps only the `preview_limit` highest-subtotal categories and
/// folds the rest into [`OTHER_BUCKET`]. Redaction never touches
/// `total_spent` or `entry_count`.
///
/// An empty ledger yields an all-zero report, not an error.
pub fn summarize(records: &[ExpenseRecord], unlocked: bool, preview_limit: usize) -> BudgetReport {
    let mut total_spent = MoneyCents::ZERO;
    let mut by_category: Vec<CategoryTotal> = Vec::new();

    for record in records {
        total_spent += record.amount;
        match by_category
            .iter_mut()
            .find(|entry| entry.category == record.category)
        {
            Some(entry) => entry.subtotal += record.amount,
            None => by_category.push(CategoryTotal {
                category: record.category.clone(),
                subtotal: record.amount,
            }),
        }
    }

    // Stable sort: equal subtotals keep first-seen order.
    by_category.sort_by(|a, b| b.subtotal.cmp(&a.subtotal));

    if !unlocked && by_category.len() > preview_limit {
        let folded = by_category.split_off(preview_limit);
        let mut other = MoneyCents::ZERO;
        for entry in folded {
            other += entry.subtotal;
        }
        by_category.push(CategoryTotal {
            category: OTHER_BUCKET.to_string(),
            subtotal: other,
        });
    }

    BudgetReport {
        total_spent,
        entry_count: records.len(),
        by_category,
        is_full: unlocked,
    }
}

/// Derives spending-pace figures: average daily spend over the span from the
/// earliest record to `now` (at least one day), and a suggested cap at 70%
/// of that average.
///
/// Returns `None` for an empty ledger.
pub fn snapshot(records: &[ExpenseRecord], now: DateTime<Utc>) -> Option<BudgetSnapshot> {
    let earliest = records.iter().map(|r| r.created_at).min()?;
    let days = ((now - earliest).num_days() + 1).max(1);

    let total: i64 = records.iter().map(|r| r.amount.cents()).sum();
    let avg_daily = total / days;
    let suggested = avg_daily * 70 / 100;

    Some(BudgetSnapshot {
        avg_daily_spend: MoneyCents::new(avg_daily),
        suggested_daily_cap: MoneyCents::new(suggested),
        days_observed: days,
    })
}

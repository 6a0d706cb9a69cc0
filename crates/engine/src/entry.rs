//! Expense records and the per-user ledger that owns them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::MoneyCents;

/// A single committed expense.
///
/// Records are immutable: the session engine builds one when a dialogue
/// completes and the ledger appends it; nothing updates or deletes it
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub user_id: u64,
    pub amount: MoneyCents,
    pub category: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub(crate) fn new(
        user_id: u64,
        amount: MoneyCents,
        category: String,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            category,
            note,
            created_at: Utc::now(),
        }
    }
}

/// Append-only, insertion-ordered collection of one user's expenses.
///
/// Invariant: every record's `user_id` matches the key under which the
/// ledger is stored; [`UserLedger::append`] enforces it with a debug
/// assertion since records are only built inside the engine.
#[derive(Clone, Debug, Default)]
pub struct UserLedger {
    user_id: u64,
    records: Vec<ExpenseRecord>,
}

impl UserLedger {
    pub(crate) fn new(user_id: u64) -> Self {
        Self {
            user_id,
            records: Vec::new(),
        }
    }

    /// Appends a record and returns the updated record count.
    ///
    /// Never fails for a well-formed record.
    pub(crate) fn append(&mut self, record: ExpenseRecord) -> usize {
        debug_assert_eq!(record.user_id, self.user_id);
        self.records.push(record);
        self.records.len()
    }

    /// All records in insertion (chronological) order.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

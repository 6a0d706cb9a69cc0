//! CSV export of a user's ledger.

use engine::ExpenseRecord;
use serde::Serialize;

#[derive(Serialize)]
struct ExportRow<'a> {
    created_at: String,
    amount_cents: i64,
    category: &'a str,
    note: Option<&'a str>,
    id: String,
}

/// Serializes the records to CSV bytes, insertion order preserved.
pub(crate) fn csv_bytes(records: &[ExpenseRecord]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for record in records {
        writer
            .serialize(ExportRow {
                created_at: record.created_at.to_rfc3339(),
                amount_cents: record.amount.cents(),
                category: &record.category,
                note: record.note.as_deref(),
                id: record.id.to_string(),
            })
            .map_err(|err| format!("failed to serialize export row: {err}"))?;
    }
    writer
        .into_inner()
        .map_err(|err| format!("failed to finalize export: {err}"))
}

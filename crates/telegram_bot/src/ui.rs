//! Reply rendering. Pure string building so everything here is testable
//! without a live bot.

use engine::{BudgetReport, BudgetSnapshot, EngineError};

pub(crate) fn welcome_text() -> String {
    "Welcome to Budget Wizard 🧙\n\n\
     /addexpense - add an expense step by step\n\
     /viewexpenses - summary of your expenses\n\
     /generatebudget - spending pace and suggested cap\n\
     /export - download your expenses as CSV\n\
     /unlockfull - unlock the full detailed report\n\
     /cancel - abort the expense in progress\n\
     /help - show this menu again"
        .to_string()
}

pub(crate) fn ask_amount() -> &'static str {
    "How much did you spend? (e.g. 12.50)"
}

pub(crate) fn ask_category() -> &'static str {
    "What category? (e.g. groceries)"
}

pub(crate) fn ask_note() -> &'static str {
    "Any note? Send - to skip."
}

pub(crate) fn rejection_text(err: &EngineError) -> String {
    match err {
        EngineError::InvalidAmount(_) => {
            "That doesn't look like an amount. Send a positive number like 12.50.".to_string()
        }
        EngineError::EmptyCategory => {
            "The category can't be empty. Send a short label like groceries.".to_string()
        }
    }
}

pub(crate) fn committed_text(report_count: usize) -> String {
    format!("✅ Added. You have {report_count} expenses. /viewexpenses for totals.")
}

pub(crate) fn idle_hint() -> &'static str {
    "No expense in progress. /addexpense to start one, /help for the menu."
}

/// Renders a report. Category order comes from the engine and is
/// deterministic, so replies are reproducible.
pub(crate) fn render_report(report: &BudgetReport) -> String {
    if report.entry_count == 0 {
        return "No expenses yet. /addexpense to add one.".to_string();
    }

    let mut lines = vec![format!(
        "📊 Total: {} over {} entries",
        report.total_spent, report.entry_count
    )];
    for entry in &report.by_category {
        lines.push(format!(" - {}: {}", entry.category, entry.subtotal));
    }
    if !report.is_full {
        lines.push("Preview only. /unlockfull for the full breakdown.".to_string());
    }
    lines.join("\n")
}

pub(crate) fn render_snapshot(snapshot: &BudgetSnapshot) -> String {
    format!(
        "🧮 Budget snapshot:\n\
         - Avg daily spend: {} (over {} days)\n\
         - Suggested cap: {}/day\n\
         /export to download your data.",
        snapshot.avg_daily_spend, snapshot.days_observed, snapshot.suggested_daily_cap
    )
}

pub(crate) fn unlock_text(paypal_link: &str) -> String {
    format!(
        "Unlock the full detailed report for $1:\n{paypal_link}\n\n\
         After payment, reply 'paid' and I'll unlock your report."
    )
}

pub(crate) fn unlocked_text() -> &'static str {
    "✅ Payment noted. Your full report is unlocked!"
}

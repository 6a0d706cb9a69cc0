//! Command structs

use teloxide::utils::command::BotCommands;

/// The command vocabulary belongs to the transport; the engine only ever
/// sees "begin dialogue", "turn", "cancel" and "report" calls.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Budget Wizard commands:")]
pub enum BudgetCommands {
    #[command(description = "Show the welcome message.")]
    Start,
    #[command(description = "Show this menu again.")]
    Help,
    #[command(description = "Add an expense step by step.")]
    AddExpense,
    #[command(description = "Cancel the expense in progress.")]
    Cancel,
    #[command(description = "Summary of your expenses.")]
    ViewExpenses,
    #[command(description = "Spending pace and a suggested daily cap.")]
    GenerateBudget,
    #[command(description = "Download your expenses as a CSV file.")]
    Export,
    #[command(description = "Unlock the full detailed report.")]
    UnlockFull,
}

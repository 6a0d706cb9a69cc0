//! Message handlers: the thin dispatcher between Telegram updates and the
//! engine.
//!
//! Policy for a command arriving mid-dialogue: the dialogue is aborted and
//! the command runs fresh. The reply tells the user their pending entry was
//! discarded, so nothing happens silently.

use engine::{DialogueEvent, Engine};
use teloxide::{
    RequestError,
    dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler},
    prelude::*,
    types::{InputFile, User},
};

use crate::{ConfigParameters, commands::BudgetCommands, exports, ui};

const EXPORT_FILENAME: &str = "expenses.csv";

/// Builds the update schema: commands first, everything else is treated as
/// a dialogue turn.
pub(crate) fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<BudgetCommands>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_text))
}

/// What a command resolves to, before anything touches the network.
#[derive(Debug)]
enum CommandAction {
    Text(String),
    Document { filename: &'static str, data: Vec<u8> },
}

async fn handle_command(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    cmd: BudgetCommands,
) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }
    let Some(user_id) = msg.from.as_ref().map(|user| user.id.0) else {
        bot.send_message(msg.chat.id, "Could not identify the user.")
            .await?;
        return Ok(());
    };

    match run_command(&cfg.engine, &cfg.paypal_link, user_id, cmd).await {
        CommandAction::Text(text) => {
            bot.send_message(msg.chat.id, text).await?;
        }
        CommandAction::Document { filename, data } => {
            bot.send_document(msg.chat.id, InputFile::memory(data).file_name(filename))
                .await?;
        }
    }

    Ok(())
}

async fn handle_text(bot: Bot, cfg: ConfigParameters, msg: Message) -> ResponseResult<()> {
    if !is_allowed(&cfg, msg.from.as_ref()) {
        return Ok(());
    }
    let Some(user_id) = msg.from.as_ref().map(|user| user.id.0) else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let reply = run_text(&cfg.engine, user_id, text).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Resolves a command against the engine.
///
/// Any open dialogue is aborted first (abort-and-reprocess policy); the
/// reply carries a note when that happened.
async fn run_command(
    engine: &Engine,
    paypal_link: &str,
    user_id: u64,
    cmd: BudgetCommands,
) -> CommandAction {
    let interrupted = engine.cancel_dialogue(user_id).await;

    let action = match cmd {
        BudgetCommands::Start | BudgetCommands::Help => CommandAction::Text(ui::welcome_text()),
        BudgetCommands::AddExpense => {
            engine.begin_dialogue(user_id).await;
            CommandAction::Text(ui::ask_amount().to_string())
        }
        BudgetCommands::Cancel => {
            let text = if interrupted {
                "Cancelled. Nothing was added."
            } else {
                "Nothing to cancel."
            };
            return CommandAction::Text(text.to_string());
        }
        BudgetCommands::ViewExpenses => {
            let report = engine.report(user_id).await;
            CommandAction::Text(ui::render_report(&report))
        }
        BudgetCommands::GenerateBudget => match engine.budget_snapshot(user_id).await {
            Some(snapshot) => CommandAction::Text(ui::render_snapshot(&snapshot)),
            None => CommandAction::Text("No data yet. /addexpense to add expenses.".to_string()),
        },
        BudgetCommands::Export => {
            let records = engine.records(user_id).await;
            if records.is_empty() {
                CommandAction::Text("No expenses yet to export.".to_string())
            } else {
                match exports::csv_bytes(&records) {
                    Ok(data) => CommandAction::Document {
                        filename: EXPORT_FILENAME,
                        data,
                    },
                    Err(err) => {
                        tracing::error!(user_id, "{err}");
                        CommandAction::Text("Export failed. Try again later.".to_string())
                    }
                }
            }
        }
        BudgetCommands::UnlockFull => CommandAction::Text(ui::unlock_text(paypal_link)),
    };

    match action {
        CommandAction::Text(text) if interrupted => CommandAction::Text(format!(
            "Discarded the expense in progress.\n\n{text}"
        )),
        other => other,
    }
}

/// Resolves a plain-text message: the payment override first, otherwise a
/// dialogue turn.
async fn run_text(engine: &Engine, user_id: u64, text: &str) -> String {
    if text.trim().eq_ignore_ascii_case("paid") {
        // Stand-in for the external payment-confirmation signal.
        engine.set_unlocked(user_id, true).await;
        tracing::info!(user_id, "full report unlocked");
        return ui::unlocked_text().to_string();
    }

    match engine.dialogue_turn(user_id, text).await {
        DialogueEvent::AskAmount => ui::ask_amount().to_string(),
        DialogueEvent::AskCategory => ui::ask_category().to_string(),
        DialogueEvent::AskNote => ui::ask_note().to_string(),
        DialogueEvent::Rejected(err) => ui::rejection_text(&err),
        DialogueEvent::Committed { total_entries, .. } => ui::committed_text(total_entries),
        DialogueEvent::NotInDialogue => ui::idle_hint().to_string(),
    }
}

fn is_allowed(cfg: &ConfigParameters, user: Option<&User>) -> bool {
    match (&cfg.allowed_users, user) {
        (None, _) => true,
        (Some(allowed), Some(user)) => allowed.contains(&user.id),
        (Some(_), None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: u64 = 77;
    const LINK: &str = "https://paypal.me/example/1";

    fn text_of(action: CommandAction) -> String {
        match action {
            CommandAction::Text(text) => text,
            CommandAction::Document { .. } => panic!("expected a text reply"),
        }
    }

    #[tokio::test]
    async fn full_dialogue_through_the_dispatcher() {
        let engine = Engine::builder().build();

        let prompt = text_of(
            run_command(&engine, LINK, USER, BudgetCommands::AddExpense).await,
        );
        assert_eq!(prompt, ui::ask_amount());

        assert_eq!(run_text(&engine, USER, "12.50").await, ui::ask_category());
        assert_eq!(run_text(&engine, USER, "Food").await, ui::ask_note());
        let done = run_text(&engine, USER, "lunch").await;
        assert!(done.contains("Added"));
        assert_eq!(engine.records(USER).await.len(), 1);
    }

    #[tokio::test]
    async fn command_mid_dialogue_aborts_and_reprocesses() {
        let engine = Engine::builder().build();
        run_command(&engine, LINK, USER, BudgetCommands::AddExpense).await;
        run_text(&engine, USER, "12.50").await;

        let reply = text_of(
            run_command(&engine, LINK, USER, BudgetCommands::ViewExpenses).await,
        );
        // The command ran fresh and the user was told about the discard.
        assert!(reply.starts_with("Discarded the expense in progress."));
        assert!(reply.contains("No expenses yet"));
        assert!(!engine.in_dialogue(USER).await);
        assert!(engine.records(USER).await.is_empty());
    }

    #[tokio::test]
    async fn cancel_reports_whether_a_dialogue_was_open() {
        let engine = Engine::builder().build();

        let reply = text_of(run_command(&engine, LINK, USER, BudgetCommands::Cancel).await);
        assert_eq!(reply, "Nothing to cancel.");

        run_command(&engine, LINK, USER, BudgetCommands::AddExpense).await;
        let reply = text_of(run_command(&engine, LINK, USER, BudgetCommands::Cancel).await);
        assert_eq!(reply, "Cancelled. Nothing was added.");
    }

    #[tokio::test]
    async fn paid_override_unlocks_and_is_idempotent() {
        let engine = Engine::builder().build();

        assert_eq!(run_text(&engine, USER, "paid").await, ui::unlocked_text());
        assert_eq!(run_text(&engine, USER, "PAID").await, ui::unlocked_text());
        assert!(engine.is_unlocked(USER).await);
    }

    #[tokio::test]
    async fn stray_text_gets_the_idle_hint() {
        let engine = Engine::builder().build();
        assert_eq!(run_text(&engine, USER, "hello").await, ui::idle_hint());
    }

    #[tokio::test]
    async fn export_sends_a_csv_document() {
        let engine = Engine::builder().build();
        run_command(&engine, LINK, USER, BudgetCommands::AddExpense).await;
        run_text(&engine, USER, "3").await;
        run_text(&engine, USER, "bus").await;
        run_text(&engine, USER, "-").await;

        match run_command(&engine, LINK, USER, BudgetCommands::Export).await {
            CommandAction::Document { filename, data } => {
                assert_eq!(filename, EXPORT_FILENAME);
                assert!(String::from_utf8(data).unwrap().contains("bus"));
            }
            CommandAction::Text(text) => panic!("expected a document, got: {text}"),
        }
    }
}

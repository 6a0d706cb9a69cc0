//! Core of the budget bot: expense ledgers, the add-expense dialogue and
//! report aggregation, all in process memory.
//!
//! The engine knows nothing about the chat transport. It consumes
//! `(user_id, text)` turns and command-shaped calls, and hands structured
//! data back for the caller to render. State starts empty on process start
//! and is discarded on shutdown; persistence is out of scope.
//!
//! Events for one user are serialized: the user's dialogue stage and ledger
//! live in one slot behind one lock, so a commit (ledger append + stage
//! reset) is a single critical section and can never be observed half done.
//! Different users contend on nothing but the slot-table lock.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

pub use access::AccessGate;
pub use entry::{ExpenseRecord, UserLedger};
pub use error::EngineError;
pub use money::MoneyCents;
pub use report::{BudgetReport, BudgetSnapshot, CategoryTotal, OTHER_BUCKET};
pub use session::{ExpenseDraft, Stage, TurnReply};

mod access;
mod entry;
mod error;
mod money;
mod report;
mod session;

/// Categories shown in a locked (preview) report before folding into
/// [`OTHER_BUCKET`].
pub const DEFAULT_PREVIEW_CATEGORIES: usize = 3;

/// One user's dialogue stage and ledger, guarded as a unit.
#[derive(Debug)]
struct UserSlot {
    stage: Stage,
    ledger: UserLedger,
}

impl UserSlot {
    fn new(user_id: u64) -> Self {
        Self {
            stage: Stage::Idle,
            ledger: UserLedger::new(user_id),
        }
    }
}

/// Outcome of feeding one inbound event into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueEvent {
    /// Ask the user for the expense amount.
    AskAmount,
    /// Ask the user for the category.
    AskCategory,
    /// Ask the user for an optional note.
    AskNote,
    /// The turn's input was invalid; same question again.
    Rejected(EngineError),
    /// The dialogue completed and the record is in the ledger.
    Committed {
        record: ExpenseRecord,
        total_entries: usize,
    },
    /// Plain text arrived while no dialogue was open.
    NotInDialogue,
}

#[derive(Debug)]
pub struct Engine {
    users: Mutex<HashMap<u64, Arc<Mutex<UserSlot>>>>,
    access: AccessGate,
    preview_categories: usize,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn slot(&self, user_id: u64) -> Arc<Mutex<UserSlot>> {
        let mut users = self.users.lock().await;
        users
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(UserSlot::new(user_id))))
            .clone()
    }

    /// Opens the add-expense dialogue for `user_id`.
    ///
    /// Returns `true` when a stale dialogue was discarded to make room.
    pub async fn begin_dialogue(&self, user_id: u64) -> bool {
        let slot = self.slot(user_id).await;
        let mut slot = slot.lock().await;
        let discarded = !slot.stage.is_idle();
        slot.stage.begin();
        discarded
    }

    /// Feeds one plain-text turn into the user's dialogue.
    ///
    /// On completion the record is appended and the stage reset before the
    /// lock is released.
    pub async fn dialogue_turn(&self, user_id: u64, input: &str) -> DialogueEvent {
        let slot = self.slot(user_id).await;
        let mut slot = slot.lock().await;

        match slot.stage.apply(input) {
            TurnReply::AskAmount => DialogueEvent::AskAmount,
            TurnReply::AskCategory => DialogueEvent::AskCategory,
            TurnReply::AskNote => DialogueEvent::AskNote,
            TurnReply::Rejected(err) => DialogueEvent::Rejected(err),
            TurnReply::NotInDialogue => DialogueEvent::NotInDialogue,
            TurnReply::Complete(draft) => {
                let record =
                    ExpenseRecord::new(user_id, draft.amount, draft.category, draft.note);
                let total_entries = slot.ledger.append(record.clone());
                tracing::info!(
                    user_id,
                    amount = %record.amount,
                    category = %record.category,
                    total_entries,
                    "expense committed"
                );
                DialogueEvent::Committed {
                    record,
                    total_entries,
                }
            }
        }
    }

    /// Cancels the user's dialogue, if any. Partial input is discarded and
    /// the ledger is untouched. Returns whether a dialogue was open.
    pub async fn cancel_dialogue(&self, user_id: u64) -> bool {
        let slot = self.slot(user_id).await;
        let mut slot = slot.lock().await;
        slot.stage.cancel()
    }

    /// Whether an add-expense dialogue is open for `user_id`.
    pub async fn in_dialogue(&self, user_id: u64) -> bool {
        let slot = self.slot(user_id).await;
        let slot = slot.lock().await;
        !slot.stage.is_idle()
    }

    /// Builds the user's budget report, redacted unless the access gate says
    /// otherwise. An unknown user gets the empty report.
    pub async fn report(&self, user_id: u64) -> BudgetReport {
        let unlocked = self.access.is_unlocked(user_id).await;
        let slot = self.slot(user_id).await;
        let slot = slot.lock().await;
        report::summarize(slot.ledger.records(), unlocked, self.preview_categories)
    }

    /// Spending-pace snapshot, `None` while the ledger is empty.
    pub async fn budget_snapshot(&self, user_id: u64) -> Option<BudgetSnapshot> {
        let slot = self.slot(user_id).await;
        let slot = slot.lock().await;
        report::snapshot(slot.ledger.records(), chrono::Utc::now())
    }

    /// Consistent copy of the user's ledger, for exports.
    pub async fn records(&self, user_id: u64) -> Vec<ExpenseRecord> {
        let slot = self.slot(user_id).await;
        let slot = slot.lock().await;
        slot.ledger.records().to_vec()
    }

    /// The access gate, for the payment collaborator to flip flags on.
    pub fn access(&self) -> &AccessGate {
        &self.access
    }

    pub async fn is_unlocked(&self, user_id: u64) -> bool {
        self.access.is_unlocked(user_id).await
    }

    pub async fn set_unlocked(&self, user_id: u64, unlocked: bool) {
        self.access.set_unlocked(user_id, unlocked).await;
    }
}

#[derive(Debug)]
pub struct EngineBuilder {
    preview_categories: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            preview_categories: DEFAULT_PREVIEW_CATEGORIES,
        }
    }
}

impl EngineBuilder {
    /// How many categories a locked report shows before folding the rest.
    pub fn preview_categories(mut self, limit: usize) -> EngineBuilder {
        self.preview_categories = limit;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            users: Mutex::new(HashMap::new()),
            access: AccessGate::default(),
            preview_categories: self.preview_categories,
        }
    }
}

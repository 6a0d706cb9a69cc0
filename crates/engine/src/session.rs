//! The add-expense dialogue as an explicit state machine.
//!
//! One dialogue collects one expense over three turns: amount, category,
//! note. Each turn validates its input before the stage advances; invalid
//! input leaves the stage untouched so the user can simply retry.
//!
//! The machine is pure: it never touches the ledger. Committing the
//! completed draft is the [`Engine`]'s job so that the append and the
//! stage reset happen under the same per-user lock.
//!
//! [`Engine`]: crate::Engine

use crate::{EngineError, MoneyCents};

/// Where a user's dialogue currently stands.
///
/// The partial input collected so far lives inside the variant, so a stage
/// can never be observed with data it should not have yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    AwaitingAmount,
    AwaitingCategory {
        amount: MoneyCents,
    },
    AwaitingNotes {
        amount: MoneyCents,
        category: String,
    },
}

/// A fully collected expense, ready to become a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: MoneyCents,
    pub category: String,
    pub note: Option<String>,
}

/// What a dialogue turn produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnReply {
    /// Dialogue (re)started, ask for the amount.
    AskAmount,
    /// Amount accepted, ask for the category.
    AskCategory,
    /// Category accepted, ask for the note.
    AskNote,
    /// Input rejected; the stage did not move.
    Rejected(EngineError),
    /// All three turns done; the draft is ready to commit.
    Complete(ExpenseDraft),
    /// No dialogue is open for this user.
    NotInDialogue,
}

impl Stage {
    /// Starts a fresh dialogue, discarding any stale one.
    pub fn begin(&mut self) -> TurnReply {
        *self = Stage::AwaitingAmount;
        TurnReply::AskAmount
    }

    /// Cancels the dialogue. Returns whether one was actually open.
    ///
    /// Cancelling from `Idle` is a no-op, not an error.
    pub fn cancel(&mut self) -> bool {
        let had_dialogue = !matches!(self, Stage::Idle);
        *self = Stage::Idle;
        had_dialogue
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Stage::Idle)
    }

    /// Feeds one turn of user input into the machine.
    ///
    /// On `Complete` the stage has already been reset to `Idle`; the caller
    /// must commit the returned draft in the same critical section.
    pub fn apply(&mut self, input: &str) -> TurnReply {
        match std::mem::take(self) {
            Stage::Idle => TurnReply::NotInDialogue,
            Stage::AwaitingAmount => match parse_amount(input) {
                Ok(amount) => {
                    *self = Stage::AwaitingCategory { amount };
                    TurnReply::AskCategory
                }
                Err(err) => {
                    *self = Stage::AwaitingAmount;
                    TurnReply::Rejected(err)
                }
            },
            Stage::AwaitingCategory { amount } => {
                let category = input.trim();
                if category.is_empty() {
                    *self = Stage::AwaitingCategory { amount };
                    return TurnReply::Rejected(EngineError::EmptyCategory);
                }
                *self = Stage::AwaitingNotes {
                    amount,
                    category: category.to_string(),
                };
                TurnReply::AskNote
            }
            Stage::AwaitingNotes { amount, category } => {
                // "-" is the chat-friendly way to skip the note.
                let note = input.trim();
                let note = (!note.is_empty() && note != "-").then(|| note.to_string());
                TurnReply::Complete(ExpenseDraft {
                    amount,
                    category,
                    note,
                })
            }
        }
    }
}

fn parse_amount(input: &str) -> Result<MoneyCents, EngineError> {
    let amount: MoneyCents = input.parse()?;
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }
    Ok(amount)
}

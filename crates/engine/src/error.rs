//! The module contains the errors the engine can throw.
//!
//! Both variants are validation failures on dialogue input: they are
//! reported back to the user as a reprompt and never change any state.
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Category must not be empty")]
    EmptyCategory,
}

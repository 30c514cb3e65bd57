use thiserror::Error;

use crate::engine::EngineState;

/// Errors emitted by `QuizEngine` transitions.
///
/// An `Err` never leaves the session half-updated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("`{operation}` is not valid while the quiz is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: EngineState,
    },

    #[error("question count must be >= 1, got {requested}")]
    InvalidCount { requested: usize },

    #[error("no questions available for category `{category}`")]
    NoQuestionsAvailable { category: String },

    #[error("page position {position} is outside the current page of {page_len}")]
    PositionOutOfPage { position: usize, page_len: usize },

    #[error("option {choice} is out of range for question {number} ({options} options)")]
    OptionOutOfRange {
        number: usize,
        choice: usize,
        options: usize,
    },
}

impl EngineError {
    /// True for errors a correct presentation layer must never trigger.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidTransition { .. }
                | EngineError::PositionOutOfPage { .. }
                | EngineError::OptionOutOfRange { .. }
        )
    }

    /// True when progression is blocked because no questions could be loaded.
    #[must_use]
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, EngineError::NoQuestionsAvailable { .. })
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::EngineError;
use quiz_core::config::ConfigError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("unsupported category: {id}")]
    UnsupportedCategory { id: String },
    #[error("question source unavailable for category `{category}`")]
    SourceUnavailable { category: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("quiz state lock poisoned")]
    StatePoisoned,
}

impl QuizServiceError {
    /// True for misuse a correct presentation layer never triggers.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        match self {
            QuizServiceError::Engine(err) => err.is_contract_violation(),
            _ => false,
        }
    }

    /// True when the caller should re-prompt for a category.
    #[must_use]
    pub fn blocks_category(&self) -> bool {
        match self {
            QuizServiceError::UnsupportedCategory { .. }
            | QuizServiceError::SourceUnavailable { .. } => true,
            QuizServiceError::Engine(err) => err.is_data_unavailable(),
            QuizServiceError::StatePoisoned => false,
        }
    }
}

/// Errors emitted while reading `AppConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigLoadError {
    #[error("invalid {key} value: {raw}")]
    InvalidValue { key: &'static str, raw: String },
    #[error(transparent)]
    Quiz(#[from] ConfigError),
}

use rand::Rng;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use quiz_core::model::CategorySelection;
use quiz_core::{
    Clock, EngineError, EngineState, LoadOutcome, PageAnswers, PageView, QuizConfig, QuizEngine,
    QuizProgress, QuizResult, SubmitOutcome,
};
use storage::{InMemoryRepository, QuestionSource};

use super::view::MenuView;
use crate::error::QuizServiceError;

/// Presentation-facing quiz facade.
///
/// Owns the time source, the question source, and the single active
/// `QuizEngine`. Clones share the same session. The engine lock is never held
/// across an `.await`, so a `reset` can land while a category is loading; the
/// late result is then discarded.
#[derive(Clone)]
pub struct QuizService {
    source: QuestionSource,
    engine: Arc<Mutex<QuizEngine>>,
}

impl QuizService {
    #[must_use]
    pub fn new(source: QuestionSource, config: QuizConfig, clock: Clock) -> Self {
        let engine = QuizEngine::new(config).with_clock(clock);
        Self {
            source,
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    #[must_use]
    pub fn in_memory(repo: InMemoryRepository, clock: Clock) -> Self {
        Self::new(QuestionSource::in_memory(repo), QuizConfig::default(), clock)
    }

    fn with_engine<T>(
        &self,
        f: impl FnOnce(&mut QuizEngine) -> T,
    ) -> Result<T, QuizServiceError> {
        let mut guard = self
            .engine
            .lock()
            .map_err(|_| QuizServiceError::StatePoisoned)?;
        Ok(f(&mut *guard))
    }

    /// Current state of the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::StatePoisoned` if the engine lock is poisoned.
    pub fn state(&self) -> Result<EngineState, QuizServiceError> {
        self.with_engine(|engine| engine.state())
    }

    /// Menu data for the category and count pickers.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::StatePoisoned` if the engine lock is poisoned.
    pub fn menu(&self) -> Result<MenuView, QuizServiceError> {
        self.with_engine(|engine| MenuView::from_config(engine.config()))
    }

    /// Load the pool for a category identifier (`"mixed"` included) and move
    /// to `CategoryChosen`.
    ///
    /// Returns `LoadOutcome::Stale` if the session was reset while loading.
    ///
    /// # Errors
    ///
    /// - `UnsupportedCategory` for an unknown identifier
    /// - `SourceUnavailable` when a single category failed to load
    /// - `Engine(NoQuestionsAvailable)` when the load succeeded but was empty
    /// - `Engine(InvalidTransition)` unless the session is idle
    pub async fn select_category(&self, id: &str) -> Result<LoadOutcome, QuizServiceError> {
        let state = self.state()?;
        if state != EngineState::Idle {
            return Err(EngineError::InvalidTransition {
                operation: "select_category",
                state,
            }
            .into());
        }

        let selection: CategorySelection = id.parse().map_err(|_| {
            warn!(category = id, "unsupported category");
            QuizServiceError::UnsupportedCategory { id: id.to_owned() }
        })?;

        let ticket = self.with_engine(|engine| engine.begin_category_load(selection))??;
        let load = self.source.load(selection).await;
        let single_failed =
            matches!(selection, CategorySelection::Single(_)) && !load.failures.is_empty();

        let finished =
            self.with_engine(|engine| engine.finish_category_load(ticket, load.questions))?;
        match finished {
            Ok(LoadOutcome::Stale) => {
                info!(category = %selection, "category load finished after reset; ignored");
                Ok(LoadOutcome::Stale)
            }
            Ok(outcome) => Ok(outcome),
            Err(EngineError::NoQuestionsAvailable { category }) if single_failed => {
                Err(QuizServiceError::SourceUnavailable { category })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Draw `count` questions and start paging.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Engine` for an invalid count or state.
    pub fn select_count(&self, count: usize) -> Result<usize, QuizServiceError> {
        Ok(self.with_engine(|engine| engine.select_count(count))??)
    }

    /// Same as [`Self::select_count`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Engine` for an invalid count or state.
    pub fn select_count_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, QuizServiceError> {
        Ok(self.with_engine(|engine| engine.select_count_with_rng(count, rng))??)
    }

    /// The page currently awaiting answers.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Engine` unless a quiz is in progress.
    pub fn current_page(&self) -> Result<PageView, QuizServiceError> {
        Ok(self.with_engine(|engine| engine.current_page())??)
    }

    /// Commit the answers of the current page.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Engine` for an invalid state or answers.
    pub fn submit_page(&self, answers: &PageAnswers) -> Result<SubmitOutcome, QuizServiceError> {
        Ok(self.with_engine(|engine| engine.submit_page(answers))??)
    }

    /// End the quiz with the pages submitted so far.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Engine` before a quiz has started.
    pub fn quit_early(&self) -> Result<(), QuizServiceError> {
        Ok(self.with_engine(QuizEngine::quit_early)??)
    }

    /// Scored result of the finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Engine` unless the quiz is completed.
    pub fn report(&self) -> Result<QuizResult, QuizServiceError> {
        Ok(self.with_engine(|engine| engine.report())??)
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::StatePoisoned` if the engine lock is poisoned.
    pub fn progress(&self) -> Result<QuizProgress, QuizServiceError> {
        self.with_engine(|engine| engine.progress())
    }

    /// Discard the session and return to the top menu.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::StatePoisoned` if the engine lock is poisoned.
    pub fn reset(&self) -> Result<(), QuizServiceError> {
        self.with_engine(QuizEngine::reset)
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Category, Question};
    use quiz_core::time::fixed_clock;

    fn set(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(format!("Q{i}"), vec!["a".into(), "b".into()], 0, None).unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn unknown_category_leaves_service_idle() {
        let service = QuizService::in_memory(InMemoryRepository::new(), fixed_clock());
        let err = service.select_category("astrology").await.unwrap_err();

        assert!(
            matches!(err, QuizServiceError::UnsupportedCategory { ref id } if id == "astrology")
        );
        assert!(err.blocks_category());
        assert!(!err.is_contract_violation());
        assert_eq!(service.state().unwrap(), EngineState::Idle);
    }

    #[tokio::test]
    async fn failed_single_category_is_source_unavailable() {
        let service = QuizService::in_memory(InMemoryRepository::new(), fixed_clock());
        let err = service.select_category("finance").await.unwrap_err();

        assert!(matches!(
            err,
            QuizServiceError::SourceUnavailable { ref category } if category == "finance"
        ));
        assert_eq!(service.state().unwrap(), EngineState::Idle);
    }

    #[tokio::test]
    async fn empty_set_is_no_questions_available() {
        let repo = InMemoryRepository::new().with_set(Category::Law, Vec::new());
        let service = QuizService::in_memory(repo, fixed_clock());
        let err = service.select_category("law").await.unwrap_err();

        assert!(matches!(
            err,
            QuizServiceError::Engine(EngineError::NoQuestionsAvailable { .. })
        ));
        assert!(err.blocks_category());
    }

    #[tokio::test]
    async fn selecting_twice_is_a_contract_violation() {
        let repo = InMemoryRepository::new().with_set(Category::Law, set(3));
        let service = QuizService::in_memory(repo, fixed_clock());
        service.select_category("law").await.unwrap();

        let err = service.select_category("law").await.unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(service.state().unwrap(), EngineState::CategoryChosen);
    }

    #[test]
    fn quit_while_idle_is_rejected() {
        let service = QuizService::in_memory(InMemoryRepository::new(), fixed_clock());
        let err = service.quit_early().unwrap_err();
        assert!(err.is_contract_violation());
        service.reset().unwrap();
        assert_eq!(service.state().unwrap(), EngineState::Idle);
    }
}

use std::sync::Arc;

use storage::{InMemoryRepository, JsonRepository, QuestionRepository, QuestionSource};
use tracing::info;

use crate::Clock;
use crate::config::AppConfig;
use crate::error::ConfigLoadError;
use crate::quiz::{MenuView, QuizService};

/// Assembles app-facing services from configuration.
#[derive(Clone, Debug)]
pub struct QuizServices {
    quiz: Arc<QuizService>,
    menu: MenuView,
}

impl QuizServices {
    /// Build services backed by the JSON question files under `config.data_dir`.
    #[must_use]
    pub fn from_config(config: &AppConfig, clock: Clock) -> Self {
        info!(data_dir = %config.data_dir.display(), "using JSON question files");
        let repo: Arc<dyn QuestionRepository> = Arc::new(JsonRepository::new(&config.data_dir));
        Self::with_repository(repo, config, clock)
    }

    /// Build services from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if the environment holds unusable values.
    pub fn from_env(clock: Clock) -> Result<Self, ConfigLoadError> {
        let config = AppConfig::from_env()?;
        Ok(Self::from_config(&config, clock))
    }

    /// Build services over an in-memory repository, for tests and prototyping.
    #[must_use]
    pub fn in_memory(repo: InMemoryRepository, config: &AppConfig, clock: Clock) -> Self {
        Self::with_repository(Arc::new(repo), config, clock)
    }

    fn with_repository(
        repo: Arc<dyn QuestionRepository>,
        config: &AppConfig,
        clock: Clock,
    ) -> Self {
        let quiz = QuizService::new(QuestionSource::new(repo), config.quiz.clone(), clock);
        Self {
            quiz: Arc::new(quiz),
            menu: MenuView::from_config(&config.quiz),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn menu(&self) -> &MenuView {
        &self.menu
    }
}

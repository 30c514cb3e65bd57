use quiz_core::model::{Category, CategorySelection, Question};
use std::sync::Arc;
use tracing::{info, warn};

use crate::repository::{InMemoryRepository, QuestionRepository, StorageError};

/// Result of loading a category selection.
///
/// `questions` is the concatenation of every set that loaded, in
/// `Category::ALL` order; `failures` lists the categories that contributed
/// nothing because their fetch failed.
#[derive(Debug, Default)]
pub struct PoolLoad {
    pub questions: Vec<Question>,
    pub failures: Vec<(Category, StorageError)>,
}

impl PoolLoad {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn failed_categories(&self) -> Vec<Category> {
        self.failures.iter().map(|(c, _)| *c).collect()
    }
}

/// Fail-safe question loader.
///
/// Never returns an error: unknown identifiers and failed fetches resolve to
/// empty contributions and are logged.
#[derive(Clone)]
pub struct QuestionSource {
    repo: Arc<dyn QuestionRepository>,
}

impl QuestionSource {
    #[must_use]
    pub fn new(repo: Arc<dyn QuestionRepository>) -> Self {
        Self { repo }
    }

    #[must_use]
    pub fn in_memory(repo: InMemoryRepository) -> Self {
        Self::new(Arc::new(repo))
    }

    /// Load the questions for a category identifier, including `"mixed"`.
    ///
    /// Unknown identifiers yield an empty set.
    pub async fn load_category(&self, id: &str) -> Vec<Question> {
        match id.parse::<CategorySelection>() {
            Ok(selection) => self.load(selection).await.questions,
            Err(err) => {
                warn!(error = %err, "unsupported category");
                Vec::new()
            }
        }
    }

    /// Load a selection. For `Mixed`, every category is fetched independently
    /// and concurrently; a failing category contributes zero questions.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load(&self, selection: CategorySelection) -> PoolLoad {
        let fetches: Vec<_> = selection
            .categories()
            .into_iter()
            .map(|category| {
                let repo = Arc::clone(&self.repo);
                let handle = tokio::spawn(async move { repo.fetch_set(category).await });
                (category, handle)
            })
            .collect();

        let mut load = PoolLoad::default();
        for (category, handle) in fetches {
            let fetched = handle
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))
                .and_then(|res| res);
            match fetched {
                Ok(questions) => load.questions.extend(questions),
                Err(err) => {
                    warn!(%category, error = %err, "question set unavailable");
                    load.failures.push((category, err));
                }
            }
        }

        info!(
            category = %selection,
            questions = load.questions.len(),
            failed = load.failures.len(),
            "question pool loaded"
        );
        load
    }
}

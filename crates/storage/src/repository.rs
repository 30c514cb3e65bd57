use async_trait::async_trait;
use quiz_core::model::{Category, Question, QuestionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by question repositories.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("unsupported category: {0}")]
    UnsupportedCategory(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a question, as found in the `questions_*.json` files.
///
/// Kept separate from the domain `Question` so the on-disk field names do not
/// leak into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "q")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub answer_index: usize,
    #[serde(
        rename = "explanation_short",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            answer_index: question.answer_index(),
            explanation: question.explanation().map(str::to_owned),
        }
    }

    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record breaks a question invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.text, self.options, self.answer_index, self.explanation)
    }
}

/// Converts records into questions, skipping (and logging) invalid ones.
#[must_use]
pub fn records_into_questions(category: Category, records: Vec<QuestionRecord>) -> Vec<Question> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match record.into_question() {
            Ok(question) => Some(question),
            Err(err) => {
                warn!(%category, index, error = %err, "skipping invalid question record");
                None
            }
        })
        .collect()
}

/// Fetches the question set of one real category.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Load every question of `category`, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be retrieved or decoded.
    async fn fetch_set(&self, category: Category) -> Result<Vec<Question>, StorageError>;
}

/// Simple in-memory repository for testing and prototyping.
///
/// A category without a stored set fails with `StorageError::NotFound`.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sets: Arc<Mutex<HashMap<Category, Vec<Question>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::insert_set`].
    ///
    /// The set is stored even if another clone poisoned the lock; only the
    /// fallible accessors report poisoning.
    #[must_use]
    pub fn with_set(self, category: Category, questions: Vec<Question>) -> Self {
        self.sets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, questions);
        self
    }

    /// Store or replace the question set of `category`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_set(
        &self,
        category: Category,
        questions: Vec<Question>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(category, questions);
        Ok(())
    }

    /// Drop the set of `category`, so later fetches fail.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn remove_set(&self, category: Category) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&category);
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn fetch_set(&self, category: Category) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&category).cloned().ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question::new(text, vec!["yes".into(), "no".into()], 0, None).unwrap()
    }

    #[tokio::test]
    async fn missing_set_is_not_found() {
        let repo = InMemoryRepository::new().with_set(Category::Law, vec![question("Q")]);

        assert_eq!(repo.fetch_set(Category::Law).await.unwrap().len(), 1);
        let err = repo.fetch_set(Category::Finance).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        repo.remove_set(Category::Law).unwrap();
        assert!(repo.fetch_set(Category::Law).await.is_err());
    }

    #[tokio::test]
    async fn with_set_survives_a_poisoned_lock() {
        let repo = InMemoryRepository::new();
        let clone = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.sets.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err = repo
            .insert_set(Category::Law, vec![question("Q")])
            .unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert!(matches!(
            repo.fetch_set(Category::Law).await,
            Err(StorageError::Connection(_))
        ));

        let repo = repo.with_set(Category::Law, vec![question("Q")]);
        let stored = repo.sets.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(stored.get(&Category::Law).map(Vec::len), Some(1));
    }

    #[test]
    fn record_uses_original_field_names() {
        let json = r#"{ "q": "What?", "options": ["a", "b"], "answer": 1, "explanation_short": "b" }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        let question = record.into_question().unwrap();

        assert_eq!(question.text(), "What?");
        assert_eq!(question.answer_index(), 1);
        assert_eq!(question.explanation(), Some("b"));
    }

    #[test]
    fn invalid_records_are_skipped() {
        let records = vec![
            QuestionRecord::from_question(&question("ok")),
            QuestionRecord {
                text: "broken".into(),
                options: vec!["only".into()],
                answer_index: 0,
                explanation: None,
            },
            QuestionRecord {
                text: "out of range".into(),
                options: vec!["a".into(), "b".into()],
                answer_index: 2,
                explanation: None,
            },
        ];

        let questions = records_into_questions(Category::Finance, records);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text(), "ok");
    }
}

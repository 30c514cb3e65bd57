use async_trait::async_trait;
use quiz_core::model::{Category, Question};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::repository::{QuestionRecord, QuestionRepository, StorageError, records_into_questions};

/// Reads question sets from one JSON file per category.
///
/// Each file holds an array of `{ "q", "options", "answer", "explanation_short" }`
/// objects. Files are re-read on every fetch; nothing is cached.
#[derive(Debug, Clone)]
pub struct JsonRepository {
    data_dir: PathBuf,
    files: BTreeMap<Category, PathBuf>,
}

impl JsonRepository {
    /// Repository over `data_dir` using the standard `questions_<id>.json` names.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let files = Category::ALL
            .into_iter()
            .map(|c| (c, default_file_name(c)))
            .collect();
        Self {
            data_dir: data_dir.into(),
            files,
        }
    }

    /// Point `category` at a different file, relative to the data directory
    /// unless absolute.
    #[must_use]
    pub fn with_file(mut self, category: Category, file: impl Into<PathBuf>) -> Self {
        self.files.insert(category, file.into());
        self
    }

    /// Stop serving `category`; fetches then fail as unsupported.
    #[must_use]
    pub fn without(mut self, category: Category) -> Self {
        self.files.remove(&category);
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn path_for(&self, category: Category) -> Option<PathBuf> {
        self.files.get(&category).map(|f| self.data_dir.join(f))
    }
}

fn default_file_name(category: Category) -> PathBuf {
    PathBuf::from(format!("questions_{}.json", category.id()))
}

#[async_trait]
impl QuestionRepository for JsonRepository {
    async fn fetch_set(&self, category: Category) -> Result<Vec<Question>, StorageError> {
        let path = self
            .path_for(category)
            .ok_or_else(|| StorageError::UnsupportedCategory(category.id().to_owned()))?;

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound,
            _ => StorageError::Io(format!("{}: {e}", path.display())),
        })?;

        let records: Vec<QuestionRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?;

        let questions = records_into_questions(category, records);
        debug!(%category, path = %path.display(), count = questions.len(), "loaded question set");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_category_ids() {
        let repo = JsonRepository::new("data");
        assert_eq!(
            repo.path_for(Category::Marketing),
            Some(PathBuf::from("data/questions_marketing.json"))
        );
    }

    #[test]
    fn overrides_and_removals_apply() {
        let repo = JsonRepository::new("data")
            .with_file(Category::Law, "legal.json")
            .without(Category::Current);

        assert_eq!(
            repo.path_for(Category::Law),
            Some(PathBuf::from("data/legal.json"))
        );
        assert_eq!(repo.path_for(Category::Current), None);
    }

    #[tokio::test]
    async fn removed_category_is_unsupported() {
        let repo = JsonRepository::new("data").without(Category::Economy);
        let err = repo.fetch_set(Category::Economy).await.unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedCategory(id) if id == "economy"));
    }
}

use std::path::PathBuf;

use quiz_core::QuizConfig;

use crate::error::ConfigLoadError;

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub quiz: QuizConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            quiz: QuizConfig::default(),
        }
    }
}

impl AppConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";

    pub const DATA_DIR_ENV: &'static str = "QUIZ_DATA_DIR";
    pub const PAGE_SIZE_ENV: &'static str = "QUIZ_PAGE_SIZE";
    pub const COUNT_CHOICES_ENV: &'static str = "QUIZ_COUNT_CHOICES";

    /// Read `QUIZ_DATA_DIR`, `QUIZ_PAGE_SIZE`, and `QUIZ_COUNT_CHOICES`
    /// (comma-separated). Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError` if a value is set but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigLoadError> {
        let data_dir = match lookup(Self::DATA_DIR_ENV) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigLoadError::InvalidValue {
                    key: Self::DATA_DIR_ENV,
                    raw,
                });
            }
            Some(raw) => PathBuf::from(raw.trim()),
            None => PathBuf::from(Self::DEFAULT_DATA_DIR),
        };

        let page_size = match lookup(Self::PAGE_SIZE_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigLoadError::InvalidValue {
                    key: Self::PAGE_SIZE_ENV,
                    raw: raw.clone(),
                })?,
            None => QuizConfig::DEFAULT_PAGE_SIZE,
        };

        let count_choices = match lookup(Self::COUNT_CHOICES_ENV) {
            Some(raw) => parse_counts(&raw).ok_or(ConfigLoadError::InvalidValue {
                key: Self::COUNT_CHOICES_ENV,
                raw: raw.clone(),
            })?,
            None => QuizConfig::DEFAULT_COUNT_CHOICES.to_vec(),
        };

        Ok(Self {
            data_dir,
            quiz: QuizConfig::new(page_size, count_choices)?,
        })
    }
}

fn parse_counts(raw: &str) -> Option<Vec<usize>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}

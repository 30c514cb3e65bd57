use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("page size must be > 0")]
    InvalidPageSize,

    #[error("at least one question count must be offered")]
    NoCountChoices,

    #[error("offered question counts must be > 0")]
    InvalidCountChoice,
}

/// Quiz-wide knobs shared by every session.
///
/// `page_size` is fixed for the lifetime of a session; engines copy it at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuizConfig")]
pub struct QuizConfig {
    page_size: usize,
    count_choices: Vec<usize>,
    default_count: usize,
}

#[derive(Deserialize)]
struct RawQuizConfig {
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default = "default_count_choices")]
    count_choices: Vec<usize>,
    #[serde(default)]
    default_count: Option<usize>,
}

fn default_page_size() -> usize {
    QuizConfig::DEFAULT_PAGE_SIZE
}

fn default_count_choices() -> Vec<usize> {
    QuizConfig::DEFAULT_COUNT_CHOICES.to_vec()
}

impl TryFrom<RawQuizConfig> for QuizConfig {
    type Error = ConfigError;

    fn try_from(raw: RawQuizConfig) -> Result<Self, Self::Error> {
        let config = Self::new(raw.page_size, raw.count_choices)?;
        match raw.default_count {
            Some(count) => config.with_default_count(count),
            None => Ok(config),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            count_choices: Self::DEFAULT_COUNT_CHOICES.to_vec(),
            default_count: Self::DEFAULT_COUNT,
        }
    }
}

impl QuizConfig {
    pub const DEFAULT_PAGE_SIZE: usize = 5;
    pub const DEFAULT_COUNT_CHOICES: [usize; 4] = [5, 10, 20, 30];
    pub const DEFAULT_COUNT: usize = 10;

    /// Creates a validated configuration.
    ///
    /// The default count becomes the offered choice closest to
    /// [`Self::DEFAULT_COUNT`] without exceeding it, or the smallest choice.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the page size or any offered count is zero,
    /// or no counts are offered.
    pub fn new(page_size: usize, mut count_choices: Vec<usize>) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if count_choices.is_empty() {
            return Err(ConfigError::NoCountChoices);
        }
        if count_choices.contains(&0) {
            return Err(ConfigError::InvalidCountChoice);
        }
        count_choices.sort_unstable();
        count_choices.dedup();

        let default_count = count_choices
            .iter()
            .copied()
            .filter(|c| *c <= Self::DEFAULT_COUNT)
            .max()
            .unwrap_or(count_choices[0]);

        Ok(Self {
            page_size,
            count_choices,
            default_count,
        })
    }

    /// Overrides the pre-selected question count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCountChoice` if `count` is zero.
    pub fn with_default_count(mut self, count: usize) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::InvalidCountChoice);
        }
        self.default_count = count;
        Ok(self)
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Question counts offered on the count menu, ascending.
    #[must_use]
    pub fn count_choices(&self) -> &[usize] {
        &self.count_choices
    }

    #[must_use]
    pub fn default_count(&self) -> usize {
        self.default_count
    }
}

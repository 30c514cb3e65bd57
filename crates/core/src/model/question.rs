use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Immutable once built; `answer_index` always points into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    text: String,
    options: Vec<String>,
    answer_index: usize,
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct RawQuestion {
    text: String,
    options: Vec<String>,
    answer_index: usize,
    #[serde(default)]
    explanation: Option<String>,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::new(raw.text, raw.options, raw.answer_index, raw.explanation)
    }
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two options are
    /// given, or `answer_index` does not address one of the options.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if answer_index >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: answer_index,
                len: options.len(),
            });
        }

        let explanation = explanation.filter(|e| !e.trim().is_empty());

        Ok(Self {
            text,
            options,
            answer_index,
            explanation,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Returns true when `choice` is the correct option.
    #[must_use]
    pub fn is_correct(&self, choice: Option<usize>) -> bool {
        choice == Some(self.answer_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new("   ", opts(2), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new("Q", opts(1), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = Question::new("Q", opts(4), 4, None).unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 4, len: 4 });
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = Question::new("Q", opts(3), 2, Some(" ".into())).unwrap();
        assert_eq!(q.explanation(), None);
        assert!(q.is_correct(Some(2)));
        assert!(!q.is_correct(None));
        assert!(!q.is_correct(Some(0)));
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let bad = r#"{"text":"","options":[],"answer_index":7,"explanation":null}"#;
        assert!(serde_json::from_str::<Question>(bad).is_err());

        let out_of_range = r#"{"text":"Q","options":["a","b"],"answer_index":2}"#;
        let err = serde_json::from_str::<Question>(out_of_range).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let q = Question::new("Q", opts(2), 1, Some("why".into())).unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(serde_json::from_str::<Question>(&json).unwrap(), q);
    }
}

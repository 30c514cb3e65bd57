use serde::Serialize;

use crate::model::Question;

/// Review data for one question, complete enough to render without lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFeedback {
    /// 1-based position in the quiz.
    pub number: usize,
    pub question_text: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub user_index: Option<usize>,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Scoring summary plus per-question feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizReport {
    pub total: usize,
    pub answered_count: usize,
    pub correct_count: usize,
    /// Percentage of answered questions answered correctly, one decimal place.
    /// Exactly `0.0` when nothing was answered.
    pub accuracy: f64,
    pub per_question: Vec<QuestionFeedback>,
}

impl QuizReport {
    /// Accuracy formatted with one decimal, e.g. `"66.7"`.
    #[must_use]
    pub fn accuracy_label(&self) -> String {
        format!("{:.1}", self.accuracy)
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total - self.answered_count
    }
}

/// Scores `selected` against `answers`.
///
/// Pure: the same inputs always produce the same report. A missing entry in
/// `answers` is scored as unanswered.
#[must_use]
pub fn build_report(selected: &[Question], answers: &[Option<usize>]) -> QuizReport {
    let per_question: Vec<QuestionFeedback> = selected
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let user_index = answers.get(idx).copied().flatten();
            QuestionFeedback {
                number: idx + 1,
                question_text: question.text().to_owned(),
                options: question.options().to_vec(),
                answer_index: question.answer_index(),
                user_index,
                is_correct: question.is_correct(user_index),
                explanation: question.explanation().map(str::to_owned),
            }
        })
        .collect();

    let answered_count = per_question
        .iter()
        .filter(|f| f.user_index.is_some())
        .count();
    let correct_count = per_question.iter().filter(|f| f.is_correct).count();

    QuizReport {
        total: per_question.len(),
        answered_count,
        correct_count,
        accuracy: accuracy(correct_count, answered_count),
        per_question,
    }
}

#[allow(clippy::cast_precision_loss)]
fn accuracy(correct: usize, answered: usize) -> f64 {
    if answered == 0 {
        return 0.0;
    }
    let percent = correct as f64 / answered as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize) -> Question {
        Question::new(
            format!("Q{answer}"),
            vec!["a".into(), "b".into(), "c".into()],
            answer,
            Some("because".into()),
        )
        .unwrap()
    }

    #[test]
    fn nothing_answered_scores_zero() {
        let selected = vec![question(0), question(1)];
        let report = build_report(&selected, &[None, None]);

        assert_eq!(report.answered_count, 0);
        assert_eq!(report.correct_count, 0);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.accuracy_label(), "0.0");
        assert!(report.per_question.iter().all(|f| f.user_index.is_none()));
    }

    #[test]
    fn accuracy_counts_only_answered() {
        let selected = vec![question(0), question(1), question(2), question(0)];
        let answers = [Some(0), Some(2), Some(2), None];
        let report = build_report(&selected, &answers);

        assert_eq!(report.total, 4);
        assert_eq!(report.answered_count, 3);
        assert_eq!(report.correct_count, 2);
        assert_eq!(report.accuracy, 66.7);
        assert_eq!(report.unanswered_count(), 1);
    }

    #[test]
    fn feedback_is_self_describing() {
        let selected = vec![question(1)];
        let report = build_report(&selected, &[Some(2)]);
        let feedback = &report.per_question[0];

        assert_eq!(feedback.number, 1);
        assert_eq!(feedback.question_text, "Q1");
        assert_eq!(feedback.options, vec!["a", "b", "c"]);
        assert_eq!(feedback.answer_index, 1);
        assert_eq!(feedback.user_index, Some(2));
        assert!(!feedback.is_correct);
        assert_eq!(feedback.explanation.as_deref(), Some("because"));
    }

    #[test]
    fn all_correct_is_one_hundred() {
        let selected: Vec<_> = (0..3).map(question).collect();
        let answers: Vec<_> = selected.iter().map(|q| Some(q.answer_index())).collect();
        let report = build_report(&selected, &answers);

        assert_eq!(report.correct_count, 3);
        assert_eq!(report.answered_count, 3);
        assert_eq!(report.accuracy, 100.0);
    }

    #[test]
    fn short_answer_slice_counts_as_unanswered() {
        let selected = vec![question(0), question(0)];
        let report = build_report(&selected, &[Some(0)]);
        assert_eq!(report.answered_count, 1);
        assert_eq!(report.per_question[1].user_index, None);
    }

    #[test]
    fn report_is_deterministic() {
        let selected = vec![question(0), question(2)];
        let answers = [Some(1), Some(2)];
        assert_eq!(build_report(&selected, &answers), build_report(&selected, &answers));
    }
}

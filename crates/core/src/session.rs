use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::model::{CategorySelection, Question};

//
// ─── PAGE ANSWERS ──────────────────────────────────────────────────────────────
//

/// Answers collected for one page, keyed by 0-based position within the page.
///
/// Positions without an entry are submitted as unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAnswers {
    choices: BTreeMap<usize, usize>,
}

impl PageAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds page answers from per-position form state, in page order.
    pub fn from_slots(slots: impl IntoIterator<Item = Option<usize>>) -> Self {
        let choices = slots
            .into_iter()
            .enumerate()
            .filter_map(|(position, choice)| choice.map(|c| (position, c)))
            .collect();
        Self { choices }
    }

    #[must_use]
    pub fn with_choice(mut self, position: usize, option: usize) -> Self {
        self.choose(position, option);
        self
    }

    pub fn choose(&mut self, position: usize, option: usize) {
        self.choices.insert(position, option);
    }

    pub fn clear(&mut self, position: usize) {
        self.choices.remove(&position);
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.choices.get(&position).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.choices.iter().map(|(p, c)| (*p, *c))
    }
}

impl FromIterator<(usize, usize)> for PageAnswers {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// The single authoritative in-memory record of one quiz session.
///
/// Invariants upheld by `QuizEngine`:
/// - `answers.len() == selected.len()`
/// - `cursor` is a multiple of the page size, or equals `selected.len()`
/// - `cursor <= selected.len()`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub(crate) category: Option<CategorySelection>,
    pub(crate) pool: Vec<Question>,
    pub(crate) selected: Vec<Question>,
    pub(crate) answers: Vec<Option<usize>>,
    pub(crate) cursor: usize,
    pub(crate) requested_count: Option<usize>,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    pub(crate) ended_early: bool,
}

impl SessionState {
    /// Fresh session with nothing chosen.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_pool(category: CategorySelection, pool: Vec<Question>) -> Self {
        Self {
            category: Some(category),
            pool,
            ..Self::default()
        }
    }

    /// Replaces the drawn subset and clears all per-session progress.
    pub(crate) fn start(
        &mut self,
        selected: Vec<Question>,
        requested_count: usize,
        started_at: DateTime<Utc>,
    ) {
        self.answers = vec![None; selected.len()];
        self.selected = selected;
        self.cursor = 0;
        self.requested_count = Some(requested_count);
        self.started_at = Some(started_at);
        self.completed_at = None;
        self.ended_early = false;
    }

    #[must_use]
    pub fn category(&self) -> Option<CategorySelection> {
        self.category
    }

    #[must_use]
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    #[must_use]
    pub fn selected(&self) -> &[Question] {
        &self.selected
    }

    /// Per-question answers, aligned with [`Self::selected`]. `None` is unanswered.
    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn requested_count(&self) -> Option<usize> {
        self.requested_count
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn ended_early(&self) -> bool {
        self.ended_early
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.pool.is_empty() && self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_answers_from_slots_skip_unanswered() {
        let page = PageAnswers::from_slots([Some(1), None, Some(0)]);
        assert_eq!(page.get(0), Some(1));
        assert_eq!(page.get(1), None);
        assert_eq!(page.get(2), Some(0));
        assert_eq!(page.iter().count(), 2);
    }

    #[test]
    fn page_answers_can_be_edited_before_submit() {
        let mut page = PageAnswers::new().with_choice(0, 2).with_choice(1, 3);
        page.choose(0, 1);
        page.clear(1);
        assert_eq!(page.get(0), Some(1));
        assert_eq!(page.get(1), None);
    }

    #[test]
    fn start_resets_answers_to_selected_len() {
        let mut state = SessionState::with_pool(CategorySelection::Mixed, Vec::new());
        state.answers = vec![Some(1)];
        state.cursor = 5;
        state.start(Vec::new(), 10, crate::time::fixed_now());

        assert!(state.answers().is_empty());
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.requested_count(), Some(10));
        assert!(!state.is_empty());
        assert!(SessionState::empty().is_empty());
    }
}

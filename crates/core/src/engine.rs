use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::config::QuizConfig;
use crate::error::EngineError;
use crate::model::{CategorySelection, FALLBACK_LABEL, Question};
use crate::report::{QuizReport, build_report};
use crate::session::{PageAnswers, SessionState};
use crate::shuffle;
use crate::time::Clock;

//
// ─── STATES & SIGNALS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EngineState {
    /// No category chosen.
    Idle,
    /// Pool loaded, question count not chosen yet.
    CategoryChosen,
    /// Paging through the selected questions.
    InProgress,
    /// All pages submitted, or quit early.
    Completed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Idle => "idle",
            EngineState::CategoryChosen => "category-chosen",
            EngineState::InProgress => "in-progress",
            EngineState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Handle for a category load that may resolve after the engine moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    selection: CategorySelection,
}

impl LoadTicket {
    #[must_use]
    pub fn selection(&self) -> CategorySelection {
        self.selection
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The pool was accepted; the engine is now `CategoryChosen`.
    Ready { pool_size: usize },
    /// The engine was reset (or another load started) before this one finished.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another page is available.
    NextPage,
    /// The last page was submitted; the result is ready.
    Completed,
}

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    /// 1-based question number across the whole quiz.
    pub number: usize,
    /// 0-based position within the page; the key used in `PageAnswers`.
    pub position: usize,
    pub question: Question,
    /// Answer currently stored for this question.
    pub answer: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page_index: usize,
    pub page_count: usize,
    pub items: Vec<PageItem>,
    pub is_last_page: bool,
}

/// Aggregated view of quiz progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub state: EngineState,
    pub total: usize,
    pub cursor: usize,
    pub answered: usize,
    pub remaining: usize,
}

/// Final outcome of a session: the pure report plus session context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResult {
    pub category: Option<CategorySelection>,
    pub category_label: &'static str,
    pub requested_count: usize,
    pub ended_early: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub report: QuizReport,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Quiz session state machine.
///
/// `Idle → CategoryChosen → InProgress → Completed`, and back to `Idle` via
/// [`QuizEngine::reset`]. Every transition either applies fully or returns an
/// error with the session untouched.
#[derive(Debug)]
pub struct QuizEngine {
    config: QuizConfig,
    clock: Clock,
    state: EngineState,
    session: SessionState,
    generation: u64,
    pending: Option<LoadTicket>,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

impl QuizEngine {
    #[must_use]
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            clock: Clock::default(),
            state: EngineState::Idle,
            session: SessionState::empty(),
            generation: 0,
            pending: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.config.page_size()
    }

    fn require(&self, expected: EngineState, operation: &'static str) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                operation,
                state: self.state,
            })
        }
    }

    // ─── Category ──────────────────────────────────────────────────────────

    /// Marks a category load as in flight.
    ///
    /// Starting a new load makes any earlier outstanding ticket stale.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` unless the engine is `Idle`.
    pub fn begin_category_load(
        &mut self,
        selection: CategorySelection,
    ) -> Result<LoadTicket, EngineError> {
        self.require(EngineState::Idle, "select_category")?;
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            selection,
        };
        self.pending = Some(ticket);
        Ok(ticket)
    }

    /// Applies the result of a load started with [`Self::begin_category_load`].
    ///
    /// A ticket that is no longer the outstanding one is ignored and reported
    /// as [`LoadOutcome::Stale`].
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NoQuestionsAvailable` if `pool` is empty; the
    /// engine stays `Idle`.
    pub fn finish_category_load(
        &mut self,
        ticket: LoadTicket,
        pool: Vec<Question>,
    ) -> Result<LoadOutcome, EngineError> {
        if self.pending != Some(ticket) || self.state != EngineState::Idle {
            debug!(category = %ticket.selection, "discarding stale category load");
            return Ok(LoadOutcome::Stale);
        }
        self.pending = None;

        if pool.is_empty() {
            return Err(EngineError::NoQuestionsAvailable {
                category: ticket.selection.id().to_owned(),
            });
        }

        let pool_size = pool.len();
        self.session = SessionState::with_pool(ticket.selection, pool);
        self.state = EngineState::CategoryChosen;
        debug!(category = %ticket.selection, pool_size, "category chosen");
        Ok(LoadOutcome::Ready { pool_size })
    }

    /// Selects a category with an already loaded pool.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` unless `Idle`, or
    /// `EngineError::NoQuestionsAvailable` if `pool` is empty.
    pub fn select_category(
        &mut self,
        selection: CategorySelection,
        pool: Vec<Question>,
    ) -> Result<usize, EngineError> {
        let ticket = self.begin_category_load(selection)?;
        match self.finish_category_load(ticket, pool)? {
            LoadOutcome::Ready { pool_size } => Ok(pool_size),
            LoadOutcome::Stale => Err(EngineError::InvalidTransition {
                operation: "select_category",
                state: self.state,
            }),
        }
    }

    // ─── Count ─────────────────────────────────────────────────────────────

    /// Draws `count` questions (or the whole pool, if smaller) in random order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` unless `CategoryChosen`, or
    /// `EngineError::InvalidCount` if `count` is zero.
    pub fn select_count(&mut self, count: usize) -> Result<usize, EngineError> {
        self.select_count_with_rng(count, &mut rand::rng())
    }

    /// Same as [`Self::select_count`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`Self::select_count`].
    pub fn select_count_with_rng<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, EngineError> {
        self.require(EngineState::CategoryChosen, "select_count")?;
        if count == 0 {
            return Err(EngineError::InvalidCount { requested: count });
        }

        let selected = shuffle::draw(&self.session.pool, count, rng);
        let drawn = selected.len();
        self.session.start(selected, count, self.clock.now());
        self.state = EngineState::InProgress;
        debug!(requested = count, drawn, "quiz started");
        Ok(drawn)
    }

    // ─── Paging ────────────────────────────────────────────────────────────

    fn page_bounds(&self) -> (usize, usize) {
        let start = self.session.cursor;
        let end = (start + self.page_size()).min(self.session.selected.len());
        (start, end)
    }

    /// Questions on the current page with their stored answers.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` unless `InProgress`.
    pub fn current_page(&self) -> Result<PageView, EngineError> {
        self.require(EngineState::InProgress, "current_page")?;
        let (start, end) = self.page_bounds();
        let total = self.session.selected.len();
        let page_size = self.page_size();

        let items = (start..end)
            .map(|idx| PageItem {
                number: idx + 1,
                position: idx - start,
                question: self.session.selected[idx].clone(),
                answer: self.session.answers[idx],
            })
            .collect();

        Ok(PageView {
            page_index: start / page_size,
            page_count: total.div_ceil(page_size),
            items,
            is_last_page: start + page_size >= total,
        })
    }

    /// Stores the answers for the current page and advances the cursor.
    ///
    /// Every position of the page is written; positions missing from
    /// `answers` become unanswered.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` unless `InProgress`, and
    /// `PositionOutOfPage`/`OptionOutOfRange` for answers that do not fit the
    /// page. Nothing is written on error.
    pub fn submit_page(&mut self, answers: &PageAnswers) -> Result<SubmitOutcome, EngineError> {
        self.require(EngineState::InProgress, "submit_page")?;
        let (start, end) = self.page_bounds();
        let page_len = end - start;

        for (position, choice) in answers.iter() {
            if position >= page_len {
                return Err(EngineError::PositionOutOfPage { position, page_len });
            }
            let question = &self.session.selected[start + position];
            if choice >= question.option_count() {
                return Err(EngineError::OptionOutOfRange {
                    number: start + position + 1,
                    choice,
                    options: question.option_count(),
                });
            }
        }

        for position in 0..page_len {
            self.session.answers[start + position] = answers.get(position);
        }
        self.session.cursor = end;

        if self.session.cursor >= self.session.selected.len() {
            self.complete(false);
            Ok(SubmitOutcome::Completed)
        } else {
            debug!(cursor = self.session.cursor, "page submitted");
            Ok(SubmitOutcome::NextPage)
        }
    }

    /// Ends the quiz with whatever has been submitted so far.
    ///
    /// Calling it again once `Completed` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` before a quiz has started.
    pub fn quit_early(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Completed => Ok(()),
            EngineState::InProgress => {
                self.complete(true);
                Ok(())
            }
            state => Err(EngineError::InvalidTransition {
                operation: "quit_early",
                state,
            }),
        }
    }

    fn complete(&mut self, ended_early: bool) {
        self.session.completed_at = Some(self.clock.now());
        self.session.ended_early = ended_early;
        self.state = EngineState::Completed;
        debug!(
            ended_early,
            answered = self.session.answered_count(),
            total = self.session.selected.len(),
            "quiz completed"
        );
    }

    // ─── Results ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.session.selected.len();
        QuizProgress {
            state: self.state,
            total,
            cursor: self.session.cursor,
            answered: self.session.answered_count(),
            remaining: total.saturating_sub(self.session.cursor),
        }
    }

    /// Scores the finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidTransition` unless `Completed`.
    pub fn report(&self) -> Result<QuizResult, EngineError> {
        self.require(EngineState::Completed, "report")?;
        let session = &self.session;
        let invalid = || EngineError::InvalidTransition {
            operation: "report",
            state: self.state,
        };

        Ok(QuizResult {
            category: session.category,
            category_label: session
                .category
                .map_or(FALLBACK_LABEL, CategorySelection::label),
            requested_count: session.requested_count.ok_or_else(invalid)?,
            ended_early: session.ended_early,
            started_at: session.started_at.ok_or_else(invalid)?,
            completed_at: session.completed_at.ok_or_else(invalid)?,
            report: build_report(&session.selected, &session.answers),
        })
    }

    /// Discards the session and returns to `Idle`. Valid from any state.
    ///
    /// Any category load still in flight becomes stale.
    pub fn reset(&mut self) {
        self.session = SessionState::empty();
        self.state = EngineState::Idle;
        self.pending = None;
        self.generation += 1;
        debug!("quiz reset");
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use chrono::{DateTime, Utc};

/// Where a quiz session reads "now" from.
///
/// `started_at` is stamped when the count is chosen and `completed_at` when
/// the last page is submitted or the quiz is ended early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// A clock pinned to `at`; every session timestamp equals it.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Quiz timestamp used by tests (2023-11-14T22:13:20Z).
#[cfg(any(test, feature = "test-util"))]
pub const QUIZ_TEST_EPOCH: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if `QUIZ_TEST_EPOCH` is not a representable timestamp.
#[cfg(any(test, feature = "test-util"))]
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(QUIZ_TEST_EPOCH, 0).expect("test epoch is representable")
}

#[cfg(any(test, feature = "test-util"))]
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod report;
pub mod session;
pub mod shuffle;
pub mod time;

pub use config::QuizConfig;
pub use engine::{
    EngineState, LoadOutcome, LoadTicket, PageItem, PageView, QuizEngine, QuizProgress,
    QuizResult, SubmitOutcome,
};
pub use error::EngineError;
pub use report::{QuestionFeedback, QuizReport, build_report};
pub use session::{PageAnswers, SessionState};
pub use time::Clock;

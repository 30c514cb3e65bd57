#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use config::AppConfig;
pub use error::{ConfigLoadError, QuizServiceError};
pub use quiz::{CategoryOption, MenuView, QuizService};

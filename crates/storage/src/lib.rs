#![forbid(unsafe_code)]

pub mod json;
pub mod repository;
pub mod source;

pub use json::JsonRepository;
pub use repository::{InMemoryRepository, QuestionRecord, QuestionRepository, StorageError};
pub use source::{PoolLoad, QuestionSource};

mod category;
mod question;

pub use category::{
    Category, CategorySelection, FALLBACK_LABEL, MIXED_ID, MIXED_LABEL, UnknownCategory,
    category_label,
};
pub use question::{Question, QuestionError};

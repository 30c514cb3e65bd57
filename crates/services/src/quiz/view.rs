use serde::Serialize;

use quiz_core::QuizConfig;
use quiz_core::model::{Category, CategorySelection};

/// One entry of the category menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub id: &'static str,
    pub label: &'static str,
}

impl From<CategorySelection> for CategoryOption {
    fn from(selection: CategorySelection) -> Self {
        Self {
            id: selection.id(),
            label: selection.label(),
        }
    }
}

/// Presentation-agnostic menu data.
///
/// This is intentionally **not** a UI view-model: no markup, no layout. The
/// presentation layer decides how to render the choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    /// Real categories in stable order, followed by the mixed option.
    pub categories: Vec<CategoryOption>,
    pub count_choices: Vec<usize>,
    pub default_count: usize,
}

impl MenuView {
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        let categories = Category::ALL
            .into_iter()
            .map(CategorySelection::Single)
            .chain(std::iter::once(CategorySelection::Mixed))
            .map(CategoryOption::from)
            .collect();

        Self {
            categories,
            count_choices: config.count_choices().to_vec(),
            default_count: config.default_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lists_mixed_last() {
        let menu = MenuView::from_config(&QuizConfig::default());

        assert_eq!(menu.categories.len(), 7);
        assert_eq!(menu.categories[0].id, "finance");
        assert_eq!(menu.categories[6].id, "mixed");
        assert_eq!(menu.categories[6].label, "総合演習");
        assert_eq!(menu.default_count, 10);
    }
}

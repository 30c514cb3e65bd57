use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display label used when a category is unset or unrecognized.
pub const FALLBACK_LABEL: &str = "未選択";

/// Display label for the synthetic union of every category.
pub const MIXED_LABEL: &str = "総合演習";

/// Identifier of the synthetic "mixed" category.
pub const MIXED_ID: &str = "mixed";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// A topical grouping of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Finance,
    Strategy,
    Marketing,
    Law,
    Economy,
    Current,
}

impl Category {
    /// Every real category, in the stable order used for mixed loads.
    pub const ALL: [Category; 6] = [
        Category::Finance,
        Category::Strategy,
        Category::Marketing,
        Category::Law,
        Category::Economy,
        Category::Current,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Category::Finance => "finance",
            Category::Strategy => "strategy",
            Category::Marketing => "marketing",
            Category::Law => "law",
            Category::Economy => "economy",
            Category::Current => "current",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Finance => "財務・会計",
            Category::Strategy => "経営戦略",
            Category::Marketing => "マーケティング",
            Category::Law => "会計・法務",
            Category::Economy => "経済・金融",
            Category::Current => "時事・応用",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// What the user picked on the category menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySelection {
    Single(Category),
    Mixed,
}

impl CategorySelection {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            CategorySelection::Single(c) => c.id(),
            CategorySelection::Mixed => MIXED_ID,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CategorySelection::Single(c) => c.label(),
            CategorySelection::Mixed => MIXED_LABEL,
        }
    }

    /// Real categories whose question sets make up this selection.
    #[must_use]
    pub fn categories(self) -> Vec<Category> {
        match self {
            CategorySelection::Single(c) => vec![c],
            CategorySelection::Mixed => Category::ALL.to_vec(),
        }
    }
}

impl From<Category> for CategorySelection {
    fn from(value: Category) -> Self {
        CategorySelection::Single(value)
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CategorySelection {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == MIXED_ID {
            return Ok(CategorySelection::Mixed);
        }
        s.parse().map(CategorySelection::Single)
    }
}

/// Label lookup for any identifier, including unset (`""`) and unknown ones.
#[must_use]
pub fn category_label(id: &str) -> &'static str {
    id.parse::<CategorySelection>()
        .map_or(FALLBACK_LABEL, CategorySelection::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_id() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>().unwrap(), category);
        }
        assert_eq!(
            "mixed".parse::<CategorySelection>().unwrap(),
            CategorySelection::Mixed
        );
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = "astrology".parse::<CategorySelection>().unwrap_err();
        assert_eq!(err, UnknownCategory("astrology".into()));
    }

    #[test]
    fn labels_fall_back_for_unset_and_unknown() {
        assert_eq!(category_label("finance"), "財務・会計");
        assert_eq!(category_label("mixed"), MIXED_LABEL);
        assert_eq!(category_label(""), FALLBACK_LABEL);
        assert_eq!(category_label("Finance"), FALLBACK_LABEL);
    }

    #[test]
    fn mixed_expands_in_stable_order() {
        assert_eq!(CategorySelection::Mixed.categories(), Category::ALL.to_vec());
        assert_eq!(
            CategorySelection::from(Category::Law).categories(),
            vec![Category::Law]
        );
    }
}

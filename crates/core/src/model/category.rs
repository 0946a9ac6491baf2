use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category name is empty")]
    Empty,
    #[error("unknown quiz preset: {0}")]
    UnknownPreset(String),
}

/// Question-pool filter sent as `?category=` when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Builds a category from a user-supplied name; surrounding whitespace is dropped.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Empty` if nothing remains after trimming.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CategoryError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the PSPO I exam-prep pool, which is graded on stricter thresholds.
    #[must_use]
    pub fn is_pspo1(&self) -> bool {
        self.0.eq_ignore_ascii_case(QuizPreset::PSPO1_CATEGORY)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

/// Quizzes offered on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPreset {
    /// Default pool, no category filter.
    #[default]
    General,
    /// PSPO I exam preparation.
    Pspo1,
}

impl QuizPreset {
    const PSPO1_CATEGORY: &'static str = "PSPO1";

    pub const ALL: [QuizPreset; 2] = [QuizPreset::General, QuizPreset::Pspo1];

    #[must_use]
    pub fn category(self) -> Option<Category> {
        match self {
            QuizPreset::General => None,
            QuizPreset::Pspo1 => Some(Category(Self::PSPO1_CATEGORY.to_owned())),
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            QuizPreset::General => "general",
            QuizPreset::Pspo1 => "pspo1",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            QuizPreset::General => "General quiz",
            QuizPreset::Pspo1 => "PSPO I exam practice",
        }
    }
}

impl FromStr for QuizPreset {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategoryError::UnknownPreset(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_trimmed() {
        let category = Category::new("  Verpleegkundig Rekenen ").unwrap();
        assert_eq!(category.as_str(), "Verpleegkundig Rekenen");
    }

    #[test]
    fn blank_category_is_rejected() {
        assert_eq!(Category::new(" \t").unwrap_err(), CategoryError::Empty);
    }

    #[test]
    fn pspo1_detection_ignores_case() {
        assert!(Category::new("pspo1").unwrap().is_pspo1());
        assert!(QuizPreset::Pspo1.category().unwrap().is_pspo1());
        assert!(!Category::new("general").unwrap().is_pspo1());
    }

    #[test]
    fn presets_parse_from_keys() {
        assert_eq!("general".parse::<QuizPreset>().unwrap(), QuizPreset::General);
        assert_eq!("PSPO1".parse::<QuizPreset>().unwrap(), QuizPreset::Pspo1);
        assert!("scrum".parse::<QuizPreset>().is_err());
        assert!(QuizPreset::General.category().is_none());
    }
}

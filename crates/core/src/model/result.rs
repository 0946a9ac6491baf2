use serde::{Deserialize, Serialize};

use crate::error::ProtocolViolation;
use crate::model::Category;

/// Final score for a finished session, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    score: u32,
    total: u32,
}

impl QuizResult {
    /// # Errors
    ///
    /// Returns `ProtocolViolation::ScoreExceedsTotal` if `score > total`.
    pub fn new(score: u32, total: u32) -> Result<Self, ProtocolViolation> {
        if score > total {
            return Err(ProtocolViolation::ScoreExceedsTotal { score, total });
        }
        Ok(Self { score, total })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whole-number percentage, rounded half up. Zero for an empty quiz.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let score = u64::from(self.score);
        let total = u64::from(self.total);
        // score <= total, so this is at most 100
        u32::try_from((score * 200 + total) / (total * 2)).unwrap_or(100)
    }

    #[must_use]
    pub fn verdict(&self, category: Option<&Category>) -> Verdict {
        VerdictThresholds::for_category(category).classify(self.percentage())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    KeepPractising,
}

/// Minimum percentages for `Verdict::Excellent` and `Verdict::Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictThresholds {
    pub excellent: u32,
    pub good: u32,
}

impl VerdictThresholds {
    pub const GENERAL: Self = Self {
        excellent: 80,
        good: 60,
    };

    /// Exam-prep pools demand more before calling it ready.
    pub const PSPO1: Self = Self {
        excellent: 85,
        good: 70,
    };

    #[must_use]
    pub fn for_category(category: Option<&Category>) -> Self {
        match category {
            Some(category) if category.is_pspo1() => Self::PSPO1,
            _ => Self::GENERAL,
        }
    }

    #[must_use]
    pub fn classify(self, percentage: u32) -> Verdict {
        if percentage >= self.excellent {
            Verdict::Excellent
        } else if percentage >= self.good {
            Verdict::Good
        } else {
            Verdict::KeepPractising
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_above_total_is_rejected() {
        assert_eq!(
            QuizResult::new(4, 3).unwrap_err(),
            ProtocolViolation::ScoreExceedsTotal { score: 4, total: 3 }
        );
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(QuizResult::new(1, 3).unwrap().percentage(), 33);
        assert_eq!(QuizResult::new(2, 3).unwrap().percentage(), 67);
        assert_eq!(QuizResult::new(1, 8).unwrap().percentage(), 13);
        assert_eq!(QuizResult::new(3, 3).unwrap().percentage(), 100);
        assert_eq!(QuizResult::new(0, 0).unwrap().percentage(), 0);
    }

    #[test]
    fn pspo1_uses_stricter_thresholds() {
        let result = QuizResult::new(8, 10).unwrap();
        let pspo = Category::new("PSPO1").unwrap();

        assert_eq!(result.verdict(None), Verdict::Excellent);
        assert_eq!(result.verdict(Some(&pspo)), Verdict::Good);
        assert_eq!(QuizResult::new(6, 10).unwrap().verdict(Some(&pspo)), Verdict::KeepPractising);
        assert_eq!(QuizResult::new(6, 10).unwrap().verdict(None), Verdict::Good);
    }
}

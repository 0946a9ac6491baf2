use quiz_core::model::{Category, QuizResult, Verdict};
use services::QuizSnapshot;

use crate::vm::time_fmt::{format_datetime, format_elapsed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_label: String,
    pub percentage: u32,
    pub verdict: Verdict,
    pub message: &'static str,
    pub elapsed_label: Option<String>,
    pub finished_at_str: Option<String>,
    /// Why the last result refetch failed; the score shown is the one already known.
    pub notice: Option<String>,
}

impl ResultVm {
    #[must_use]
    pub fn new(result: QuizResult, category: Option<&Category>) -> Self {
        let verdict = result.verdict(category);
        let exam = category.is_some_and(Category::is_pspo1);
        Self {
            score_label: format!(
                "Score: {} / {} ({}%)",
                result.score(),
                result.total(),
                result.percentage()
            ),
            percentage: result.percentage(),
            verdict,
            message: verdict_message(verdict, exam),
            elapsed_label: None,
            finished_at_str: None,
            notice: None,
        }
    }

    /// `None` until the session has a result.
    #[must_use]
    pub fn from_snapshot(snapshot: &QuizSnapshot) -> Option<Self> {
        let result = snapshot.result?;
        let mut vm = Self::new(result, snapshot.category.as_ref());
        vm.elapsed_label = snapshot
            .elapsed()
            .map(|elapsed| format!("Time: {}", format_elapsed(elapsed)));
        vm.finished_at_str = snapshot.finished_at.map(format_datetime);
        vm.notice = snapshot
            .failure
            .as_ref()
            .map(|failure| format!("Could not refresh the result: {}", failure.message));
        Some(vm)
    }
}

/// Exam-prep quizzes speak to exam readiness; the rest just cheer.
#[must_use]
pub fn verdict_message(verdict: Verdict, exam: bool) -> &'static str {
    match (verdict, exam) {
        (Verdict::Excellent, true) => "Excellent! You are ready for the PSPO I exam!",
        (Verdict::Good, true) => "Good! A little more study and you will be ready.",
        (Verdict::KeepPractising, true) => "Keep practising. You need more preparation.",
        (Verdict::Excellent, false) => "Great result!",
        (Verdict::Good, false) => "Well done!",
        (Verdict::KeepPractising, false) => "Keep practising!",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use quiz_core::time::fixed_now;
    use services::{Failure, FailureKind};

    use super::*;

    fn result(score: u32, total: u32) -> QuizResult {
        QuizResult::new(score, total).unwrap()
    }

    #[test]
    fn score_line_shows_rounded_percentage() {
        let vm = ResultVm::new(result(2, 3), None);
        assert_eq!(vm.score_label, "Score: 2 / 3 (67%)");
        assert_eq!(vm.verdict, Verdict::Good);
        assert_eq!(vm.message, "Well done!");
    }

    #[test]
    fn exam_category_raises_the_bar() {
        let pspo = Category::new("pspo1").unwrap();

        let vm = ResultVm::new(result(8, 10), Some(&pspo));
        assert_eq!(vm.verdict, Verdict::Good);
        assert_eq!(vm.message, "Good! A little more study and you will be ready.");

        let vm = ResultVm::new(result(8, 10), None);
        assert_eq!(vm.verdict, Verdict::Excellent);
    }

    #[test]
    fn empty_quiz_scores_zero_percent() {
        let vm = ResultVm::new(result(0, 0), None);
        assert_eq!(vm.score_label, "Score: 0 / 0 (0%)");
        assert_eq!(vm.verdict, Verdict::KeepPractising);
    }

    #[test]
    fn snapshot_adds_timing() {
        let started = fixed_now();
        let snapshot = QuizSnapshot {
            result: Some(result(3, 3)),
            started_at: Some(started),
            finished_at: Some(started + Duration::seconds(95)),
            ..QuizSnapshot::default()
        };

        let vm = ResultVm::from_snapshot(&snapshot).unwrap();
        assert_eq!(vm.score_label, "Score: 3 / 3 (100%)");
        assert_eq!(vm.elapsed_label.as_deref(), Some("Time: 1m 35s"));
        assert_eq!(vm.finished_at_str.as_deref(), Some("2023-11-14 22:14 UTC"));
        assert_eq!(vm.notice, None);

        assert!(ResultVm::from_snapshot(&QuizSnapshot::default()).is_none());
    }

    #[test]
    fn failed_refresh_is_shown_next_to_known_score() {
        let snapshot = QuizSnapshot {
            result: Some(result(1, 1)),
            failure: Some(Failure {
                kind: FailureKind::Api,
                message: "db down".to_string(),
            }),
            ..QuizSnapshot::default()
        };

        let vm = ResultVm::from_snapshot(&snapshot).unwrap();
        assert_eq!(vm.score_label, "Score: 1 / 1 (100%)");
        assert_eq!(vm.notice.as_deref(), Some("Could not refresh the result: db down"));
    }
}

use quiz_core::model::ChoiceMark;
use services::{QuizPhase, QuizSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    Wrong,
}

impl AnswerFeedback {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AnswerFeedback::Correct => "Correct!",
            AnswerFeedback::Wrong => "Wrong.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    /// 1-based, as typed by the player.
    pub number: usize,
    pub label: String,
    pub mark: ChoiceMark,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub prompt: String,
    pub progress_label: Option<String>,
    pub score_label: String,
    pub choices: Vec<ChoiceVm>,
    pub feedback: Option<AnswerFeedback>,
    /// An answer is on screen and `next` will move on.
    pub revealed: bool,
}

/// Builds the question screen, or `None` when no question is loaded.
#[must_use]
pub fn map_question(snapshot: &QuizSnapshot) -> Option<QuestionVm> {
    let question = snapshot.question.as_ref()?;
    let answer = snapshot.answer.as_ref();
    let enabled = snapshot.can_answer();

    let choices = question
        .choices()
        .iter()
        .enumerate()
        .map(|(index, label)| ChoiceVm {
            number: index + 1,
            label: label.clone(),
            mark: answer.map_or(ChoiceMark::Unmarked, |a| a.mark(index)),
            enabled,
        })
        .collect();

    let feedback = answer.map(|a| {
        if a.is_correct() {
            AnswerFeedback::Correct
        } else {
            AnswerFeedback::Wrong
        }
    });

    Some(QuestionVm {
        prompt: question.text().to_string(),
        progress_label: progress_label(snapshot.index, snapshot.total),
        score_label: score_label(snapshot.score),
        choices,
        feedback,
        revealed: snapshot.phase == QuizPhase::AnswerRevealed,
    })
}

/// `Question k of N`, with `k` counted from one.
#[must_use]
pub fn progress_label(index: Option<u32>, total: Option<u32>) -> Option<String> {
    let (index, total) = (index?, total?);
    Some(format!("Question {} of {total}", index.saturating_add(1)))
}

#[must_use]
pub fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

#[cfg(test)]
mod tests {
    use quiz_core::model::{AnswerAttempt, Question};

    use super::*;

    fn snapshot_with_question() -> QuizSnapshot {
        let choices = ["A", "B", "C", "D"].map(String::from).to_vec();
        QuizSnapshot {
            phase: QuizPhase::QuestionActive,
            index: Some(4),
            total: Some(20),
            score: 2,
            question: Some(Question::new("Which ones?", choices).unwrap()),
            ..QuizSnapshot::default()
        }
    }

    #[test]
    fn unanswered_question_is_clickable() {
        let vm = map_question(&snapshot_with_question()).unwrap();

        assert_eq!(vm.prompt, "Which ones?");
        assert_eq!(vm.progress_label.as_deref(), Some("Question 5 of 20"));
        assert_eq!(vm.score_label, "Score: 2");
        assert_eq!(vm.choices.len(), 4);
        assert!(vm.choices.iter().all(|c| c.enabled && c.mark == ChoiceMark::Unmarked));
        assert_eq!(vm.choices[3].number, 4);
        assert_eq!(vm.feedback, None);
        assert!(!vm.revealed);
    }

    #[test]
    fn revealed_answer_marks_every_correct_choice() {
        let mut snapshot = snapshot_with_question();
        snapshot.phase = QuizPhase::AnswerRevealed;
        snapshot.answer = Some(AnswerAttempt::new(1, true, [1, 3]));

        let vm = map_question(&snapshot).unwrap();
        let marks: Vec<_> = vm.choices.iter().map(|c| c.mark).collect();
        assert_eq!(
            marks,
            [
                ChoiceMark::Unmarked,
                ChoiceMark::PickedCorrect,
                ChoiceMark::Unmarked,
                ChoiceMark::Correct,
            ]
        );
        assert!(vm.choices.iter().all(|c| !c.enabled));
        assert_eq!(vm.feedback, Some(AnswerFeedback::Correct));
        assert!(vm.revealed);
    }

    #[test]
    fn wrong_pick_is_flagged() {
        let mut snapshot = snapshot_with_question();
        snapshot.phase = QuizPhase::AnswerRevealed;
        snapshot.answer = Some(AnswerAttempt::new(0, false, [2]));

        let vm = map_question(&snapshot).unwrap();
        assert_eq!(vm.choices[0].mark, ChoiceMark::PickedWrong);
        assert_eq!(vm.choices[2].mark, ChoiceMark::Correct);
        assert_eq!(vm.feedback.map(AnswerFeedback::label), Some("Wrong."));
    }

    #[test]
    fn progress_needs_both_numbers() {
        assert_eq!(progress_label(Some(0), None), None);
        assert_eq!(progress_label(Some(0), Some(1)).as_deref(), Some("Question 1 of 1"));
        assert!(map_question(&QuizSnapshot::default()).is_none());
    }
}

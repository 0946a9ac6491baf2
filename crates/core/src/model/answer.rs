use std::collections::BTreeSet;

/// How a single choice should be drawn once the answer is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Unmarked,
    /// A correct choice the user did not pick.
    Correct,
    PickedCorrect,
    PickedWrong,
}

impl ChoiceMark {
    #[must_use]
    pub fn is_highlighted(self) -> bool {
        matches!(self, ChoiceMark::Correct | ChoiceMark::PickedCorrect)
    }
}

/// Server verdict on the submission for the active question.
///
/// Correctness always comes from the server; the client never decides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerAttempt {
    choice: usize,
    correct: bool,
    correct_answers: BTreeSet<usize>,
}

impl AnswerAttempt {
    #[must_use]
    pub fn new(
        choice: usize,
        correct: bool,
        correct_answers: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            choice,
            correct,
            correct_answers: correct_answers.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn choice(&self) -> usize {
        self.choice
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// All indices the server reported as correct. May be empty.
    #[must_use]
    pub fn correct_answers(&self) -> &BTreeSet<usize> {
        &self.correct_answers
    }

    #[must_use]
    pub fn mark(&self, index: usize) -> ChoiceMark {
        if index == self.choice {
            if self.correct {
                ChoiceMark::PickedCorrect
            } else {
                ChoiceMark::PickedWrong
            }
        } else if self.correct_answers.contains(&index) {
            ChoiceMark::Correct
        } else {
            ChoiceMark::Unmarked
        }
    }

    /// Indices drawn as correct: every reported correct answer plus the pick if it was right.
    #[must_use]
    pub fn highlighted(&self) -> BTreeSet<usize> {
        let mut set = self.correct_answers.clone();
        if self.correct {
            set.insert(self.choice);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_correct_answers_are_all_highlighted() {
        let attempt = AnswerAttempt::new(1, true, [1, 3]);

        assert_eq!(attempt.highlighted(), BTreeSet::from([1, 3]));
        assert_eq!(attempt.mark(0), ChoiceMark::Unmarked);
        assert_eq!(attempt.mark(1), ChoiceMark::PickedCorrect);
        assert_eq!(attempt.mark(2), ChoiceMark::Unmarked);
        assert_eq!(attempt.mark(3), ChoiceMark::Correct);
    }

    #[test]
    fn wrong_pick_is_marked_and_not_highlighted() {
        let attempt = AnswerAttempt::new(0, false, [2]);

        assert_eq!(attempt.mark(0), ChoiceMark::PickedWrong);
        assert_eq!(attempt.mark(2), ChoiceMark::Correct);
        assert_eq!(attempt.highlighted(), BTreeSet::from([2]));
    }

    #[test]
    fn missing_correct_set_still_marks_the_pick() {
        let attempt = AnswerAttempt::new(2, true, []);
        assert!(attempt.correct_answers().is_empty());
        assert_eq!(attempt.highlighted(), BTreeSet::from([2]));
    }
}

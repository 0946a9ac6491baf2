use std::fmt;

use quiz_core::model::Category;

/// Where a `QuizSessionController` is in the quiz lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    /// No session yet.
    #[default]
    Idle,
    /// A start, question, answer or result request is in flight.
    Loading,
    /// A question is on screen and has not been answered.
    QuestionActive,
    /// The answer for the current question has been graded by the server.
    AnswerRevealed,
    /// Final score is known; only `start` leaves this phase.
    Finished,
    /// The last request failed; `start` or `retry` leaves this phase.
    Errored,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizPhase::Idle => "idle",
            QuizPhase::Loading => "loading",
            QuizPhase::QuestionActive => "question",
            QuizPhase::AnswerRevealed => "answer revealed",
            QuizPhase::Finished => "finished",
            QuizPhase::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// What a controller call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The call ran and left the controller in this phase.
    Moved(QuizPhase),
    /// The call was a no-op; no request was sent and no state changed.
    Ignored(Ignored),
}

impl Step {
    #[must_use]
    pub fn phase(self) -> Option<QuizPhase> {
        match self {
            Step::Moved(phase) => Some(phase),
            Step::Ignored(_) => None,
        }
    }

    #[must_use]
    pub fn is_ignored(self) -> bool {
        matches!(self, Step::Ignored(_))
    }
}

/// Why a controller call was a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    /// Another request is already in flight.
    Busy,
    /// No session has been started.
    NoSession,
    /// The call does not apply to the current phase.
    WrongPhase(QuizPhase),
    /// The active question already has an accepted answer.
    AlreadyAnswered,
    ChoiceOutOfRange { choice: usize, choices: usize },
    /// The response belonged to a session that was restarted or discarded meanwhile.
    Stale,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ignored::Busy => f.write_str("a request is already in flight"),
            Ignored::NoSession => f.write_str("no quiz has been started"),
            Ignored::WrongPhase(phase) => write!(f, "not available while {phase}"),
            Ignored::AlreadyAnswered => f.write_str("this question has already been answered"),
            Ignored::ChoiceOutOfRange { choice, choices } => {
                write!(f, "choice {choice} is not one of the {choices} options")
            }
            Ignored::Stale => f.write_str("response arrived for an abandoned session"),
        }
    }
}

/// Operation that drove the controller into `QuizPhase::Errored`, kept for `retry`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    Start(Option<Category>),
    Resume(Resume),
}

/// Failed operations that continue an existing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resume {
    LoadQuestion,
    SubmitAnswer(usize),
    FetchResult,
}

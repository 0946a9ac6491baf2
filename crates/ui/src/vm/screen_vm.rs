use services::{FailureKind, QuizPhase, QuizSnapshot};

use super::{QuestionVm, ResultVm, map_question};

/// What the player should be looking at for a given snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenVm {
    Welcome,
    Loading,
    Question(QuestionVm),
    Result(ResultVm),
    Error(ErrorVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorVm {
    pub title: &'static str,
    pub message: String,
}

#[must_use]
pub fn map_screen(snapshot: &QuizSnapshot) -> ScreenVm {
    match snapshot.phase {
        QuizPhase::Idle => ScreenVm::Welcome,
        QuizPhase::Loading => ScreenVm::Loading,
        QuizPhase::QuestionActive | QuizPhase::AnswerRevealed => {
            map_question(snapshot).map_or(ScreenVm::Loading, ScreenVm::Question)
        }
        QuizPhase::Finished => {
            ResultVm::from_snapshot(snapshot).map_or(ScreenVm::Loading, ScreenVm::Result)
        }
        QuizPhase::Errored => ScreenVm::Error(map_error(snapshot)),
    }
}

fn map_error(snapshot: &QuizSnapshot) -> ErrorVm {
    let Some(failure) = &snapshot.failure else {
        return ErrorVm {
            title: "Something went wrong",
            message: String::new(),
        };
    };
    let title = match failure.kind {
        FailureKind::Transport => "Could not reach the quiz server",
        FailureKind::Api => "The quiz server refused the request",
        FailureKind::Protocol => "The quiz server sent an unexpected response",
        FailureKind::Request => "Could not build the request to the quiz server",
    };
    ErrorVm {
        title,
        message: failure.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use quiz_core::model::QuizResult;
    use services::Failure;

    use super::*;

    #[test]
    fn phases_map_to_screens() {
        assert_eq!(map_screen(&QuizSnapshot::default()), ScreenVm::Welcome);

        let loading = QuizSnapshot {
            phase: QuizPhase::Loading,
            ..QuizSnapshot::default()
        };
        assert_eq!(map_screen(&loading), ScreenVm::Loading);

        let finished = QuizSnapshot {
            phase: QuizPhase::Finished,
            result: Some(QuizResult::new(1, 2).unwrap()),
            ..QuizSnapshot::default()
        };
        assert!(matches!(map_screen(&finished), ScreenVm::Result(vm) if vm.percentage == 50));
    }

    #[test]
    fn error_screen_keeps_server_message() {
        let snapshot = QuizSnapshot {
            phase: QuizPhase::Errored,
            failure: Some(Failure {
                kind: FailureKind::Api,
                message: "db down".to_string(),
            }),
            ..QuizSnapshot::default()
        };

        let ScreenVm::Error(vm) = map_screen(&snapshot) else {
            panic!("expected error screen");
        };
        assert_eq!(vm.title, "The quiz server refused the request");
        assert_eq!(vm.message, "db down");
    }

    #[test]
    fn bad_request_url_gets_its_own_title() {
        let snapshot = QuizSnapshot {
            phase: QuizPhase::Errored,
            failure: Some(Failure {
                kind: FailureKind::Request,
                message: "invalid request url: empty host".to_string(),
            }),
            ..QuizSnapshot::default()
        };

        let ScreenVm::Error(vm) = map_screen(&snapshot) else {
            panic!("expected error screen");
        };
        assert_eq!(vm.title, "Could not build the request to the quiz server");
    }
}

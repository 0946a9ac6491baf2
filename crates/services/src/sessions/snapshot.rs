use chrono::{DateTime, Duration, Utc};

use quiz_core::model::{AnswerAttempt, Category, Question, QuizResult, SessionId};

use crate::error::ApiError;
use super::phase::QuizPhase;

/// Coarse class of a failure, for labelling only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Network failure, no response.
    Transport,
    /// Non-2xx response.
    Api,
    /// The response did not have the expected shape.
    Protocol,
    /// The request URL could not be built; nothing was sent.
    Request,
}

/// Displayable reason the controller entered `QuizPhase::Errored`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&ApiError> for Failure {
    fn from(err: &ApiError) -> Self {
        let kind = match err {
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::Status { .. } => FailureKind::Api,
            ApiError::Protocol(_) => FailureKind::Protocol,
            ApiError::Url(_) => FailureKind::Request,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Everything a view needs to draw the quiz, copied out of the controller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub session_id: Option<SessionId>,
    pub category: Option<Category>,
    pub score: u32,
    pub index: Option<u32>,
    pub total: Option<u32>,
    pub question: Option<Question>,
    pub answer: Option<AnswerAttempt>,
    pub result: Option<QuizResult>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub failure: Option<Failure>,
}

impl QuizSnapshot {
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        Some(self.finished_at? - self.started_at?)
    }

    /// Whether `submit_answer` would currently send a request.
    #[must_use]
    pub fn can_answer(&self) -> bool {
        self.phase == QuizPhase::QuestionActive && self.answer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use quiz_core::ProtocolViolation;

    use super::*;

    #[test]
    fn failure_kind_follows_error_variant() {
        let failure = Failure::from(&ApiError::status(StatusCode::CONFLICT, "already over"));
        assert_eq!(failure.kind, FailureKind::Api);
        assert_eq!(failure.message, "already over");

        let failure = Failure::from(&ApiError::from(ProtocolViolation::EmptySessionId));
        assert_eq!(failure.kind, FailureKind::Protocol);
    }

    #[test]
    fn bad_request_url_is_not_a_transport_failure() {
        let failure = Failure::from(&ApiError::from(url::ParseError::EmptyHost));
        assert_eq!(failure.kind, FailureKind::Request);
        assert_eq!(failure.message, "invalid request url: empty host");
    }
}

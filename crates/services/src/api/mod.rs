//! Remote quiz API seam.
//!
//! `QuizApi` is what the session controller talks to. `HttpQuizApi` is the real
//! implementation; tests substitute scripted fakes.

mod http;
mod wire;

use async_trait::async_trait;
use quiz_core::model::{Category, Question, QuizResult, SessionId};

use crate::error::ApiError;

pub use http::{HttpQuizApi, QuizApiConfig, SessionMode, parse_timeout};

/// Outcome of `GET /api/question`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFetch {
    /// No questions left; the final result should be fetched instead.
    Finished,
    Active {
        index: u32,
        total: u32,
        question: Question,
    },
}

/// Outcome of `POST /api/answer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Every correct choice index; empty when the server did not say.
    pub correct_answers: Vec<usize>,
    pub finished: bool,
    /// Final tally, when the server embedded one in a finishing answer.
    pub result: Option<QuizResult>,
}

#[async_trait]
pub trait QuizApi: Send + Sync {
    /// `POST /api/start[?category=..]`
    async fn start(&self, category: Option<&Category>) -> Result<SessionId, ApiError>;

    /// `GET /api/question`
    async fn question(&self, session: &SessionId) -> Result<QuestionFetch, ApiError>;

    /// `POST /api/answer` with `{ "choice": .. }`
    async fn answer(&self, session: &SessionId, choice: usize) -> Result<AnswerOutcome, ApiError>;

    /// `GET /api/result`
    async fn result(&self, session: &SessionId) -> Result<QuizResult, ApiError>;
}

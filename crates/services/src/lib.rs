#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use api::{
    AnswerOutcome, HttpQuizApi, QuestionFetch, QuizApi, QuizApiConfig, SessionMode, parse_timeout,
};
pub use error::{ApiError, ConfigError};
pub use sessions::{
    Failure, FailureKind, Ignored, QuizPhase, QuizSessionController, QuizSnapshot,
    SessionObserver, Step,
};

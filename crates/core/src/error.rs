use thiserror::Error;

/// Shapes a quiz API response can have that the client refuses to act on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolViolation {
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("server issued an empty session id")]
    EmptySessionId,

    #[error("question has no choices")]
    NoChoices,

    #[error("score {score} exceeds total {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("malformed response: {0}")]
    Malformed(String),
}

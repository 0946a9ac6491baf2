use serde::{Deserialize, Serialize};

use quiz_core::ProtocolViolation;
use quiz_core::model::{Question, QuizResult, SessionId};

use super::{AnswerOutcome, QuestionFetch};

#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    #[serde(alias = "sessionId")]
    session_id: Option<String>,
}

impl TryFrom<StartResponse> for SessionId {
    type Error = ProtocolViolation;

    fn try_from(value: StartResponse) -> Result<Self, Self::Error> {
        let raw = value
            .session_id
            .ok_or(ProtocolViolation::MissingField("session_id"))?;
        SessionId::new(raw).map_err(|_| ProtocolViolation::EmptySessionId)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionResponse {
    #[serde(default)]
    finished: bool,
    index: Option<u32>,
    total: Option<u32>,
    question: Option<QuestionBody>,
}

#[derive(Debug, Deserialize)]
struct QuestionBody {
    // the reference server passes its bank rows through, which name the prompt `question`
    #[serde(alias = "question")]
    text: String,
    choices: Vec<String>,
}

impl TryFrom<QuestionResponse> for QuestionFetch {
    type Error = ProtocolViolation;

    fn try_from(value: QuestionResponse) -> Result<Self, Self::Error> {
        if value.finished {
            return Ok(QuestionFetch::Finished);
        }
        let body = value
            .question
            .ok_or(ProtocolViolation::MissingField("question"))?;
        let index = value.index.ok_or(ProtocolViolation::MissingField("index"))?;
        let total = value.total.ok_or(ProtocolViolation::MissingField("total"))?;
        Ok(QuestionFetch::Active {
            index,
            total,
            question: Question::new(body.text, body.choices)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerRequest {
    pub(crate) choice: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerResponse {
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    correct_answers: Option<Vec<usize>>,
    #[serde(default)]
    finished: bool,
    score: Option<u32>,
    total: Option<u32>,
}

impl TryFrom<AnswerResponse> for AnswerOutcome {
    type Error = ProtocolViolation;

    fn try_from(value: AnswerResponse) -> Result<Self, Self::Error> {
        let result = match (value.finished, value.score, value.total) {
            (true, Some(score), Some(total)) => Some(QuizResult::new(score, total)?),
            _ => None,
        };
        Ok(AnswerOutcome {
            correct: value.correct,
            correct_answers: value.correct_answers.unwrap_or_default(),
            finished: value.finished,
            result,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultResponse {
    score: u32,
    total: u32,
}

impl TryFrom<ResultResponse> for QuizResult {
    type Error = ProtocolViolation;

    fn try_from(value: ResultResponse) -> Result<Self, Self::Error> {
        QuizResult::new(value.score, value.total)
    }
}

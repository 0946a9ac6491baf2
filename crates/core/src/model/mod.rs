mod answer;
mod category;
mod ids;
mod question;
mod result;
mod session;

pub use answer::{AnswerAttempt, ChoiceMark};
pub use category::{Category, CategoryError, QuizPreset};
pub use ids::{ParseIdError, SessionId};
pub use question::Question;
pub use result::{QuizResult, Verdict, VerdictThresholds};
pub use session::Session;

mod question_vm;
mod result_vm;
mod screen_vm;
mod time_fmt;

pub use question_vm::{
    AnswerFeedback, ChoiceVm, QuestionVm, map_question, progress_label, score_label,
};
pub use result_vm::{ResultVm, verdict_message};
pub use screen_vm::{ErrorVm, ScreenVm, map_screen};
pub use time_fmt::{format_datetime, format_elapsed};

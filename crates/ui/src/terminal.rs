use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use quiz_core::model::{ChoiceMark, QuizPreset};
use services::{QuizSnapshot, SessionObserver};

use crate::vm::{ChoiceVm, ErrorVm, QuestionVm, ResultVm, ScreenVm, map_screen};

/// Plain-text renderer. Redraws the screen for every controller change except the
/// transient `Loading` state.
pub struct TerminalView<W> {
    out: Mutex<W>,
}

impl TerminalView<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// # Errors
    ///
    /// Returns the writer's I/O error.
    pub fn draw(&self, screen: &ScreenVm) -> io::Result<()> {
        let text = render_screen(screen);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> SessionObserver for TerminalView<W> {
    fn on_change(&self, snapshot: &QuizSnapshot) {
        let screen = map_screen(snapshot);
        if screen == ScreenVm::Loading {
            return;
        }
        if let Err(err) = self.draw(&screen) {
            log::warn!("failed to draw quiz screen: {err}");
        }
    }
}

#[must_use]
pub fn render_screen(screen: &ScreenVm) -> String {
    match screen {
        ScreenVm::Welcome => render_menu(),
        ScreenVm::Loading => "Loading...\n".to_string(),
        ScreenVm::Question(vm) => render_question(vm),
        ScreenVm::Result(vm) => render_result(vm),
        ScreenVm::Error(vm) => render_error(vm),
    }
}

/// Numbered list of `QuizPreset::ALL`.
#[must_use]
pub fn render_menu() -> String {
    let mut text = String::from("\nChoose a quiz:\n");
    for (number, preset) in QuizPreset::ALL.iter().enumerate() {
        let _ = writeln!(text, "  {}) {}", number + 1, preset.title());
    }
    text.push_str("Type a number (Enter for 1), q to quit.\n");
    text
}

fn render_question(vm: &QuestionVm) -> String {
    let mut text = String::from("\n");
    match &vm.progress_label {
        Some(progress) => {
            let _ = writeln!(text, "{progress}    {}", vm.score_label);
        }
        None => {
            let _ = writeln!(text, "{}", vm.score_label);
        }
    }
    let _ = writeln!(text, "{}", vm.prompt);
    for choice in &vm.choices {
        let _ = writeln!(text, "  {}", render_choice(choice));
    }
    if let Some(feedback) = vm.feedback {
        let _ = writeln!(text, "{}", feedback.label());
    }
    if vm.revealed {
        text.push_str("Press Enter for the next question, q to quit.\n");
    } else {
        let _ = writeln!(text, "Type 1-{} to answer, q to quit.", vm.choices.len());
    }
    text
}

fn render_choice(choice: &ChoiceVm) -> String {
    let note = match choice.mark {
        ChoiceMark::Unmarked => "",
        ChoiceMark::Correct => "  <- correct",
        ChoiceMark::PickedCorrect => "  <- your answer, correct",
        ChoiceMark::PickedWrong => "  <- your answer, wrong",
    };
    format!("{}) {}{note}", choice.number, choice.label)
}

fn render_result(vm: &ResultVm) -> String {
    let mut text = String::from("\nQuiz complete!\n");
    let _ = writeln!(text, "{}", vm.score_label);
    let _ = writeln!(text, "{}", vm.message);
    if let Some(elapsed) = &vm.elapsed_label {
        let _ = writeln!(text, "{elapsed}");
    }
    if let Some(notice) = &vm.notice {
        let _ = writeln!(text, "{notice}");
    }
    text.push_str("Play again? [y/N]\n");
    text
}

fn render_error(vm: &ErrorVm) -> String {
    let mut text = format!("\n{}", vm.title);
    if !vm.message.is_empty() {
        let _ = write!(text, ": {}", vm.message);
    }
    text.push_str("\nType r to retry, s to start over, q to quit.\n");
    text
}

use serde::{Deserialize, Serialize};

use crate::error::ProtocolViolation;

/// The prompt currently on screen.
///
/// Choice order is significant: answer indices refer to positions in `choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    choices: Vec<String>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `ProtocolViolation::NoChoices` if there is nothing to answer with.
    pub fn new(text: impl Into<String>, choices: Vec<String>) -> Result<Self, ProtocolViolation> {
        if choices.is_empty() {
            return Err(ProtocolViolation::NoChoices);
        }
        Ok(Self {
            text: text.into(),
            choices,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn has_choice(&self, index: usize) -> bool {
        index < self.choices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_keep_server_order() {
        let question = Question::new(
            "Pick one",
            vec!["D".into(), "A".into(), "C".into(), "B".into()],
        )
        .unwrap();
        assert_eq!(question.choices(), ["D", "A", "C", "B"]);
        assert!(question.has_choice(3));
        assert!(!question.has_choice(4));
    }

    #[test]
    fn question_without_choices_is_a_protocol_violation() {
        assert_eq!(
            Question::new("Empty", Vec::new()).unwrap_err(),
            ProtocolViolation::NoChoices
        );
    }
}

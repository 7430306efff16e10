use thiserror::Error;

use services::SessionError;

/// Failures surfaced to the person taking the quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewError {
    #[error("no option `{0}` on this question")]
    UnknownOption(String),
    #[error("question {0} does not exist")]
    NoSuchQuestion(usize),
    #[error("pick a single option for this question")]
    SingleChoiceOnly,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ViewError {
    /// Text for the prompt line; service failures collapse to a generic message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::Session(SessionError::Api(_)) => {
                "Something went wrong. Please try again.".to_owned()
            }
            other => other.to_string(),
        }
    }
}

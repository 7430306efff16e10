use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use services::{ApiError, QuizLoopService, SessionError};

use super::quiz_vm::QuizVm;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Please enter your email address")]
    Missing,
    #[error("Please enter a valid email address")]
    Invalid,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl StartError {
    /// Message shown under the start prompt.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            StartError::Email(err) => err.to_string(),
            StartError::Session(err) => start_failure_message(err),
        }
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Trim `raw` and check it looks like `local@domain.tld`.
///
/// # Errors
///
/// Returns `EmailError::Missing` for blank input and `EmailError::Invalid`
/// when the address has whitespace, no single `@`, or no dotted domain.
pub fn validate_email(raw: &str) -> Result<String, EmailError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(EmailError::Missing);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(EmailError::Invalid);
    }
    Ok(email.to_owned())
}

#[must_use]
pub fn start_failure_message(err: &SessionError) -> String {
    match err {
        SessionError::Api(ApiError::Rejected(message)) => message
            .clone()
            .unwrap_or_else(|| "Failed to start quiz".to_owned()),
        SessionError::Empty => "This quiz has no questions yet".to_owned(),
        _ => "Failed to start quiz. Please try again.".to_owned(),
    }
}

/// Validate the email and open a new quiz for it.
///
/// # Errors
///
/// Returns `StartError::Email` for a malformed address (the API is not
/// called) and `StartError::Session` when the quiz could not be started.
pub async fn start_quiz(quiz_loop: &QuizLoopService, raw_email: &str) -> Result<QuizVm, StartError> {
    let email = validate_email(raw_email)?;
    let quiz = quiz_loop.start_quiz(&email).await?;
    Ok(QuizVm::new(quiz))
}

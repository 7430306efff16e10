use chrono::{DateTime, Utc};

use crate::model::{Answer, Question, QuizId, QuizResults};
use super::persisted::PersistedState;

/// Payload for starting (or restarting) a quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct StartQuiz {
    pub quiz_id: QuizId,
    pub email: String,
    pub questions: Vec<Question>,
    pub duration_secs: u32,
    pub started_at: DateTime<Utc>,
}

/// The closed set of transitions a [`QuizSession`](super::QuizSession) accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start(StartQuiz),
    SetCurrentQuestion(usize),
    /// Record an answer for the current question.
    SetAnswer(Answer),
    ToggleBookmark(usize),
    ToggleReviewLater(usize),
    SetNote { index: usize, text: String },
    SetHintUsed(usize),
    IncrementTime(usize),
    UpdateTimer(u32),
    Complete(QuizResults),
    Reset,
    LoadPersisted(PersistedState),
}

impl Action {
    /// Stable name used in logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start(_) => "START",
            Action::SetCurrentQuestion(_) => "SET_CURRENT_QUESTION",
            Action::SetAnswer(_) => "SET_ANSWER",
            Action::ToggleBookmark(_) => "TOGGLE_BOOKMARK",
            Action::ToggleReviewLater(_) => "TOGGLE_REVIEW_LATER",
            Action::SetNote { .. } => "SET_NOTE",
            Action::SetHintUsed(_) => "SET_HINT_USED",
            Action::IncrementTime(_) => "INCREMENT_TIME",
            Action::UpdateTimer(_) => "UPDATE_TIMER",
            Action::Complete(_) => "COMPLETE",
            Action::Reset => "RESET",
            Action::LoadPersisted(_) => "LOAD_PERSISTED",
        }
    }
}

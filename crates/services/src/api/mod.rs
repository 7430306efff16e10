//! Remote quiz API: the trait the session services talk to, plus the reqwest client.

mod http;

use async_trait::async_trait;
use serde::Serialize;

use quiz_core::model::{Answer, Question, QuizId, QuizResults};

use crate::error::ApiError;

pub use http::HttpQuizApi;

/// A freshly created quiz as returned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedQuiz {
    pub quiz_id: QuizId,
    pub questions: Vec<Question>,
}

/// Partial per-question update. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

impl QuestionPatch {
    #[must_use]
    pub fn visited() -> Self {
        Self {
            visited: Some(true),
            ..Self::default()
        }
    }

    /// An answer also marks the question attempted and visited.
    #[must_use]
    pub fn answered(answer: Answer) -> Self {
        Self {
            visited: Some(true),
            attempted: Some(true),
            user_answer: Some(answer),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hint_used() -> Self {
        Self {
            hint_used: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn time_spent(seconds: u32) -> Self {
        Self {
            time_spent: Some(seconds),
            ..Self::default()
        }
    }
}

/// Contract for the quiz backend.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Create a quiz for `email`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or a rejected request.
    async fn start_quiz(&self, email: &str) -> Result<StartedQuiz, ApiError>;

    /// Push a partial update for one question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or a rejected request.
    async fn update_question(
        &self,
        quiz_id: &QuizId,
        index: usize,
        patch: &QuestionPatch,
    ) -> Result<(), ApiError>;

    /// Submit the quiz and receive the graded results.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or a rejected request.
    async fn submit_quiz(&self, quiz_id: &QuizId, time_taken: u32)
    -> Result<QuizResults, ApiError>;

    /// Fetch graded results for a submitted quiz.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or a rejected request.
    async fn get_results(&self, quiz_id: &QuizId) -> Result<QuizResults, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patches_omit_absent_fields() {
        assert_eq!(
            serde_json::to_value(QuestionPatch::visited()).unwrap(),
            json!({ "visited": true })
        );
        assert_eq!(
            serde_json::to_value(QuestionPatch::time_spent(42)).unwrap(),
            json!({ "time_spent": 42 })
        );
        assert_eq!(
            serde_json::to_value(QuestionPatch::hint_used()).unwrap(),
            json!({ "hint_used": true })
        );
    }

    #[test]
    fn answer_patch_carries_both_answer_shapes() {
        assert_eq!(
            serde_json::to_value(QuestionPatch::answered(Answer::single("Paris"))).unwrap(),
            json!({ "visited": true, "attempted": true, "user_answer": "Paris" })
        );
        assert_eq!(
            serde_json::to_value(QuestionPatch::answered(Answer::multi(["C", "A"]))).unwrap(),
            json!({ "visited": true, "attempted": true, "user_answer": ["A", "C"] })
        );
    }
}

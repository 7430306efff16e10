use serde::{Deserialize, Serialize};

use crate::model::answer::Answer;
use crate::model::lenient;
use crate::model::question::{Difficulty, category_key};

/// Per-question outcome returned by the quiz service after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    #[serde(default, rename = "question", deserialize_with = "lenient::text_or_empty")]
    pub prompt: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_correct: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub hint_used: bool,
    /// Seconds spent on the question; absent or non-numeric values read as `None`.
    #[serde(default, deserialize_with = "lenient::number")]
    pub time_spent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::answer")]
    pub user_answer: Option<Answer>,
    #[serde(default, deserialize_with = "lenient::answer")]
    pub correct_answer: Option<Answer>,
}

impl QuestionResult {
    #[must_use]
    pub fn category_key(&self) -> &str {
        category_key(self.category.as_deref())
    }
}

/// Final result payload attached to a session when it completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub time_taken: u32,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub questions: Vec<QuestionResult>,
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::model::answer::Answer;
use crate::model::lenient;

/// Category key used when a question carries no category label.
pub const DEFAULT_CATEGORY: &str = "General";

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tag attached to every question.
///
/// Parsing is lenient: a missing or unrecognized value falls back to `Easy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse a tag case-insensitively, defaulting to `Easy`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Easy,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(Self::parse_lenient)
            .unwrap_or_default())
    }
}

/// Grouping key for a category label: the segment before the first colon.
///
/// Missing or empty labels map to [`DEFAULT_CATEGORY`].
#[must_use]
pub fn category_key(label: Option<&str>) -> &str {
    match label {
        Some(label) if !label.is_empty() => label.split(':').next().unwrap_or(label),
        _ => DEFAULT_CATEGORY,
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question as delivered by the remote quiz service.
///
/// Text fields may contain HTML entities or markup and must be treated as
/// untrusted content by whatever renders them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub all_answers: Vec<String>,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    pub correct_answer: Answer,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl Question {
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("boolean"))
    }

    /// Multi-select when the correct answer is a set or the mode says so.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.correct_answer.is_multi()
            || self
                .mode
                .as_deref()
                .is_some_and(|mode| mode.eq_ignore_ascii_case("multi"))
    }

    /// Selectable options in display order.
    ///
    /// Uses `all_answers` when present, `True`/`False` for boolean questions,
    /// and otherwise the incorrect answers followed by the correct one(s).
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        if !self.all_answers.is_empty() {
            return self.all_answers.clone();
        }
        if self.is_boolean() {
            return vec!["True".to_owned(), "False".to_owned()];
        }

        let mut options: Vec<String> = self
            .incorrect_answers
            .iter()
            .filter(|a| !a.is_empty())
            .cloned()
            .collect();
        match &self.correct_answer {
            Answer::Single(choice) if !choice.is_empty() => options.push(choice.clone()),
            Answer::Single(_) => {}
            Answer::Multi(choices) => options.extend(choices.iter().cloned()),
        }
        options
    }

    #[must_use]
    pub fn category_key(&self) -> &str {
        category_key(self.category.as_deref())
    }

    /// Grade a submitted answer against this question's correct answer.
    #[must_use]
    pub fn is_correct(&self, submitted: &Answer) -> bool {
        self.correct_answer.accepts(submitted)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// A recorded answer: one choice, or a set of choices for multi-select questions.
///
/// On the wire this is either a JSON string or a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multi(BTreeSet<String>),
}

impl Answer {
    #[must_use]
    pub fn single(choice: impl Into<String>) -> Self {
        Self::Single(choice.into())
    }

    /// Build a multi-select answer. Duplicate choices collapse.
    #[must_use]
    pub fn multi<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(choices.into_iter().map(Into::into).collect())
    }

    /// The chosen values as a set; a single answer is a set of one.
    #[must_use]
    pub fn choices(&self) -> BTreeSet<&str> {
        match self {
            Answer::Single(choice) => std::iter::once(choice.as_str()).collect(),
            Answer::Multi(choices) => choices.iter().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, choice: &str) -> bool {
        match self {
            Answer::Single(value) => value == choice,
            Answer::Multi(choices) => choices.contains(choice),
        }
    }

    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self, Answer::Multi(_))
    }

    /// Whether `submitted` fully matches this (correct) answer.
    ///
    /// Exact set equality: no partial credit, so extra or missing choices are
    /// both incorrect.
    #[must_use]
    pub fn accepts(&self, submitted: &Answer) -> bool {
        self.choices() == submitted.choices()
    }

    /// Flip one choice in a multi-select answer, starting from `current`.
    ///
    /// A single answer in `current` is treated as a one-element set.
    #[must_use]
    pub fn toggled(current: Option<&Answer>, choice: &str) -> Answer {
        let mut set: BTreeSet<String> = current
            .map(|answer| answer.choices().into_iter().map(str::to_owned).collect())
            .unwrap_or_default();
        if !set.remove(choice) {
            set.insert(choice.to_owned());
        }
        Answer::Multi(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_select_requires_exact_set() {
        let correct = Answer::multi(["A", "C"]);
        assert!(correct.accepts(&Answer::multi(["C", "A"])));
        assert!(!correct.accepts(&Answer::multi(["A"])));
        assert!(!correct.accepts(&Answer::multi(["A", "B", "C"])));
        assert!(!correct.accepts(&Answer::multi(Vec::<String>::new())));
    }

    #[test]
    fn single_answers_compare_by_value() {
        let correct = Answer::single("Paris");
        assert!(correct.accepts(&Answer::single("Paris")));
        assert!(!correct.accepts(&Answer::single("Lyon")));
    }

    #[test]
    fn toggling_adds_then_removes() {
        let first = Answer::toggled(None, "B");
        assert_eq!(first, Answer::multi(["B"]));
        let second = Answer::toggled(Some(&first), "D");
        assert_eq!(second, Answer::multi(["B", "D"]));
        let third = Answer::toggled(Some(&second), "B");
        assert_eq!(third, Answer::multi(["D"]));
    }

    #[test]
    fn wire_format_is_string_or_array() {
        let single: Answer = serde_json::from_str("\"True\"").unwrap();
        assert_eq!(single, Answer::single("True"));

        let multi: Answer = serde_json::from_str("[\"C\", \"A\", \"C\"]").unwrap();
        assert_eq!(multi, Answer::multi(["A", "C"]));
        assert_eq!(serde_json::to_string(&multi).unwrap(), "[\"A\",\"C\"]");
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The four session fields mirrored to local storage per quiz.
///
/// Sets serialize as arrays of indices; maps serialize as objects keyed by
/// the stringified index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub bookmarked: BTreeSet<usize>,
    #[serde(default)]
    pub review_later: BTreeSet<usize>,
    #[serde(default)]
    pub notes: BTreeMap<usize, String>,
    #[serde(default)]
    pub time_spent: BTreeMap<usize, u32>,
}

impl PersistedState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookmarked.is_empty()
            && self.review_later.is_empty()
            && self.notes.is_empty()
            && self.time_spent.is_empty()
    }

    /// Largest index referenced by any field.
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        [
            self.bookmarked.last().copied(),
            self.review_later.last().copied(),
            self.notes.keys().next_back().copied(),
            self.time_spent.keys().next_back().copied(),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Drop every entry whose index is `>= len`. Returns how many were dropped.
    pub fn retain_in_range(&mut self, len: usize) -> usize {
        let before = self.entry_count();
        self.bookmarked.retain(|i| *i < len);
        self.review_later.retain(|i| *i < len);
        self.notes.retain(|i, _| *i < len);
        self.time_spent.retain(|i, _| *i < len);
        before - self.entry_count()
    }

    fn entry_count(&self) -> usize {
        self.bookmarked.len() + self.review_later.len() + self.notes.len() + self.time_spent.len()
    }
}

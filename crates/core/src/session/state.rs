use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::model::{Answer, Question, QuizId, QuizResults};
use super::persisted::PersistedState;

/// Quiz length used when the caller does not choose one (30 minutes).
pub const DEFAULT_DURATION_SECS: u32 = 30 * 60;

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub visited: usize,
    /// Questions not yet visited.
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Full state of one quiz attempt.
///
/// Fields are only mutated through [`QuizSession::dispatch`] / [`QuizSession::apply`];
/// everything here is a read accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub(super) quiz_id: Option<QuizId>,
    pub(super) email: String,
    pub(super) questions: Arc<[Question]>,
    pub(super) duration_secs: u32,
    pub(super) started_at: Option<DateTime<Utc>>,
    pub(super) current: Option<usize>,
    pub(super) answers: BTreeMap<usize, Answer>,
    pub(super) visited: BTreeSet<usize>,
    pub(super) attempted: BTreeSet<usize>,
    pub(super) bookmarked: BTreeSet<usize>,
    pub(super) review_later: BTreeSet<usize>,
    pub(super) notes: BTreeMap<usize, String>,
    pub(super) hint_used: BTreeSet<usize>,
    pub(super) time_spent: BTreeMap<usize, u32>,
    pub(super) time_remaining: u32,
    pub(super) completed: bool,
    pub(super) results: Option<QuizResults>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// The initial, not-yet-started state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quiz_id: None,
            email: String::new(),
            questions: Arc::from(Vec::<Question>::new()),
            duration_secs: DEFAULT_DURATION_SECS,
            started_at: None,
            current: None,
            answers: BTreeMap::new(),
            visited: BTreeSet::new(),
            attempted: BTreeSet::new(),
            bookmarked: BTreeSet::new(),
            review_later: BTreeSet::new(),
            notes: BTreeMap::new(),
            hint_used: BTreeSet::new(),
            time_spent: BTreeMap::new(),
            time_remaining: DEFAULT_DURATION_SECS,
            completed: false,
            results: None,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> Option<&QuizId> {
        self.quiz_id.as_ref()
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Index of the active question; `None` until the first navigation.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(&index)
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, Answer> {
        &self.answers
    }

    #[must_use]
    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    #[must_use]
    pub fn attempted(&self) -> &BTreeSet<usize> {
        &self.attempted
    }

    #[must_use]
    pub fn bookmarked(&self) -> &BTreeSet<usize> {
        &self.bookmarked
    }

    #[must_use]
    pub fn review_later(&self) -> &BTreeSet<usize> {
        &self.review_later
    }

    #[must_use]
    pub fn notes(&self) -> &BTreeMap<usize, String> {
        &self.notes
    }

    #[must_use]
    pub fn note(&self, index: usize) -> &str {
        self.notes.get(&index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn hint_used(&self) -> &BTreeSet<usize> {
        &self.hint_used
    }

    #[must_use]
    pub fn time_spent(&self) -> &BTreeMap<usize, u32> {
        &self.time_spent
    }

    #[must_use]
    pub fn time_spent_on(&self, index: usize) -> u32 {
        self.time_spent.get(&index).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Seconds elapsed on the countdown so far.
    #[must_use]
    pub fn time_taken(&self) -> u32 {
        self.duration_secs.saturating_sub(self.time_remaining)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.quiz_id.is_some()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Started, not completed, and time left on the clock.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_started() && !self.completed && self.time_remaining > 0
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            total,
            answered: self.attempted.len(),
            visited: self.visited.len(),
            remaining: total.saturating_sub(self.visited.len()),
            is_complete: self.completed,
        }
    }

    /// Snapshot of the fields mirrored to local storage.
    #[must_use]
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            bookmarked: self.bookmarked.clone(),
            review_later: self.review_later.clone(),
            notes: self.notes.clone(),
            time_spent: self.time_spent.clone(),
        }
    }
}

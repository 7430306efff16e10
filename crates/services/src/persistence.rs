//! Mirrors the bookmark, review-later, note and time fields of a session into
//! local storage, scoped per quiz id.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use quiz_core::model::QuizId;
use quiz_core::session::{Action, PersistedState, QuizSession};
use storage::repository::{KeyValueRepository, StateKey, StorageError};

/// Hydrates a session from storage and writes changed fields back.
///
/// Writes are skipped until hydration for the session's quiz id has run, so a
/// fresh quiz never clobbers stored data with empty defaults.
pub struct PersistenceSync {
    values: Arc<dyn KeyValueRepository>,
    hydrated_for: Option<QuizId>,
    last_written: Option<PersistedState>,
}

impl PersistenceSync {
    #[must_use]
    pub fn new(values: Arc<dyn KeyValueRepository>) -> Self {
        Self {
            values,
            hydrated_for: None,
            last_written: None,
        }
    }

    /// Quiz id the sync is currently bound to.
    #[must_use]
    pub fn quiz_id(&self) -> Option<&QuizId> {
        self.hydrated_for.as_ref()
    }

    /// Read stored fields for `quiz_id`. Missing or unreadable fields come back empty.
    pub async fn load(&self, quiz_id: &QuizId) -> PersistedState {
        PersistedState {
            bookmarked: self.read_field(quiz_id, StateKey::Bookmarks).await,
            review_later: self.read_field(quiz_id, StateKey::ReviewLater).await,
            notes: self.read_field(quiz_id, StateKey::Notes).await,
            time_spent: self.read_field(quiz_id, StateKey::TimeSpent).await,
        }
    }

    /// Load stored fields for the session's quiz and apply them with `LOAD_PERSISTED`.
    ///
    /// Entries pointing past the end of the question list are dropped first.
    /// Does nothing for a session that has not started.
    pub async fn hydrate(&mut self, session: &mut QuizSession) {
        let Some(quiz_id) = session.quiz_id().cloned() else {
            return;
        };

        let mut persisted = self.load(&quiz_id).await;
        let dropped = persisted.retain_in_range(session.total_questions());
        if dropped > 0 {
            warn!("dropped {dropped} stored entries beyond the question list of quiz {quiz_id}");
        }

        match session.dispatch(Action::LoadPersisted(persisted)) {
            Ok(()) => {
                debug!("hydrated stored state for quiz {quiz_id}");
                self.last_written = Some(session.persisted());
                self.hydrated_for = Some(quiz_id);
            }
            Err(err) => warn!("could not apply stored state for quiz {quiz_id}: {err}"),
        }
    }

    /// Write the persisted fields if they changed since the last write.
    ///
    /// Storage failures are logged and otherwise ignored.
    pub async fn write_through(&mut self, session: &QuizSession) {
        let Some(quiz_id) = session.quiz_id() else {
            return;
        };
        if self.hydrated_for.as_ref() != Some(quiz_id) {
            return;
        }

        let snapshot = session.persisted();
        if self.last_written.as_ref() == Some(&snapshot) {
            return;
        }

        match self.save(quiz_id, &snapshot).await {
            Ok(()) => self.last_written = Some(snapshot),
            Err(err) => warn!("could not store state for quiz {quiz_id}: {err}"),
        }
    }

    /// Unbind from the current quiz. Stored data is kept.
    pub fn detach(&mut self) {
        self.hydrated_for = None;
        self.last_written = None;
    }

    async fn save(&self, quiz_id: &QuizId, state: &PersistedState) -> Result<(), StorageError> {
        let entries = vec![
            (StateKey::Bookmarks.for_quiz(quiz_id), encode(&state.bookmarked)?),
            (StateKey::ReviewLater.for_quiz(quiz_id), encode(&state.review_later)?),
            (StateKey::Notes.for_quiz(quiz_id), encode(&state.notes)?),
            (StateKey::TimeSpent.for_quiz(quiz_id), encode(&state.time_spent)?),
        ];
        self.values.put_values(&entries).await
    }

    async fn read_field<T>(&self, quiz_id: &QuizId, key: StateKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.values.get_value(&key.for_quiz(quiz_id)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!("could not read {key} for quiz {quiz_id}: {err}");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("ignoring malformed {key} for quiz {quiz_id}: {err}");
            T::default()
        })
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))
}

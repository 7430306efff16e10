use async_trait::async_trait;
use quiz_core::model::QuizId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── KEYS ──────────────────────────────────────────────────────────────────────
//

/// The four per-quiz entries mirrored to local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Bookmarks,
    ReviewLater,
    Notes,
    TimeSpent,
}

impl StateKey {
    pub const ALL: [StateKey; 4] = [
        StateKey::Bookmarks,
        StateKey::ReviewLater,
        StateKey::Notes,
        StateKey::TimeSpent,
    ];

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            StateKey::Bookmarks => "bookmarks",
            StateKey::ReviewLater => "reviewLater",
            StateKey::Notes => "notes",
            StateKey::TimeSpent => "timeSpent",
        }
    }

    /// Storage key scoped to one quiz, e.g. `bookmarks:q1`.
    #[must_use]
    pub fn for_quiz(self, quiz_id: &QuizId) -> String {
        format!("{}:{}", self.prefix(), quiz_id.as_str())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

//
// ─── REPOSITORY ────────────────────────────────────────────────────────────────
//

/// String key/value store holding serialized session fields.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write every entry, replacing existing values. Entries land together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entries cannot be stored.
    async fn put_values(&self, entries: &[(String, String)]) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put_values(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (key, value) in entries {
            guard.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub values: Arc<dyn KeyValueRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let values: Arc<dyn KeyValueRepository> = Arc::new(InMemoryRepository::new());
        Self { values }
    }
}

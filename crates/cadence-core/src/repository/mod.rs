//! Persistence seam
//!
//! The engine never does I/O itself. A host stores one [`StoredSession`]
//! per (user, library) through a [`SessionRepository`]; the snapshot is the
//! engine's, the summary is a derived projection refreshed on every save.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, SerializedSession};
use crate::error::SnapshotError;
use crate::progress::LibrarySummary;

/// Repository error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored snapshot could not be decoded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    /// Stored document is not valid JSON
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),
    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Identifies one learner's progress through one library
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryKey {
    /// Learner the progress belongs to
    pub user_id: String,
    /// Catalog the progress is for
    pub library_id: String,
}

impl LibraryKey {
    /// Key for a user and library
    pub fn new(user_id: impl Into<String>, library_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            library_id: library_id.into(),
        }
    }
}

impl std::fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.library_id)
    }
}

/// Snapshot plus the summary computed when it was saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Resumable engine snapshot
    pub session: SerializedSession,
    /// Summary as of the save
    pub summary: LibrarySummary,
}

impl StoredSession {
    /// Encode as a JSON document
    pub fn to_json(&self) -> Result<String, RepositoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a JSON document, migrating an older snapshot inside it
    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        let mut doc: Value = serde_json::from_str(json)?;
        let session = match doc.get_mut("session") {
            Some(raw) => codec::from_value(raw.take())?,
            None => {
                return Err(RepositoryError::Backend(
                    "stored document has no session".to_string(),
                ));
            }
        };
        let summary = doc
            .get_mut("summary")
            .map(Value::take)
            .unwrap_or_default();
        let summary = serde_json::from_value(summary)?;
        Ok(Self { session, summary })
    }
}

/// Load and save stored sessions by key
pub trait SessionRepository {
    /// Stored session for `key`, if any
    fn load(&self, key: &LibraryKey) -> Result<Option<StoredSession>, RepositoryError>;

    /// Replace the stored session for `key`
    fn save(&self, key: &LibraryKey, stored: &StoredSession) -> Result<(), RepositoryError>;

    /// Forget the stored session for `key`; returns whether one existed
    fn delete(&self, key: &LibraryKey) -> Result<bool, RepositoryError>;
}

/// Repository kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    sessions: Mutex<HashMap<LibraryKey, StoredSession>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<LibraryKey, StoredSession>>, RepositoryError> {
        self.sessions
            .lock()
            .map_err(|e| RepositoryError::Backend(format!("lock poisoned: {e}")))
    }
}

impl SessionRepository for InMemoryRepository {
    fn load(&self, key: &LibraryKey) -> Result<Option<StoredSession>, RepositoryError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &LibraryKey, stored: &StoredSession) -> Result<(), RepositoryError> {
        self.lock()?.insert(key.clone(), stored.clone());
        Ok(())
    }

    fn delete(&self, key: &LibraryKey) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.remove(key).is_some())
    }
}

//! File-backed session repository: one JSON document per (user, library).

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use cadence_core::{LibraryKey, RepositoryError, SessionRepository, StoredSession};
use tracing::debug;

/// Stores sessions under `<root>/<user>/<library>.json`
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    /// Repository rooted at `root` (created on first save)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Document path for a key
    pub fn path_for(&self, key: &LibraryKey) -> PathBuf {
        self.root
            .join(file_component(&key.user_id))
            .join(format!("{}.json", file_component(&key.library_id)))
    }
}

/// Encode an id as a single path component.
///
/// Lowercase ASCII letters, digits and `-` pass through; every other byte
/// (including `_` and uppercase) becomes `_XX`. The mapping is one-to-one and
/// stays distinct on case-insensitive file systems. The empty id is `_`, which
/// no escape produces.
fn file_component(id: &str) -> String {
    if id.is_empty() {
        return "_".to_string();
    }
    let mut encoded = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("_{byte:02X}")),
        }
    }
    encoded
}

impl SessionRepository for FileRepository {
    fn load(&self, key: &LibraryKey) -> Result<Option<StoredSession>, RepositoryError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!(path = %path.display(), "Loading stored session");
                Ok(Some(StoredSession::from_json(&raw)?))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &LibraryKey, stored: &StoredSession) -> Result<(), RepositoryError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // write then rename so a crash never leaves a half-written document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, stored.to_json()?)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "Saved session");
        Ok(())
    }

    fn delete(&self, key: &LibraryKey) -> Result<bool, RepositoryError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

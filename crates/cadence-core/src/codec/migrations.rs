//! Snapshot Migrations
//!
//! Upgrades for older snapshot documents, applied on the raw JSON before it
//! is decoded into [`SerializedSession`](super::SerializedSession).

use serde_json::{Map, Value};
use tracing::warn;

/// Schema version assumed for documents without a `schemaVersion` field
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    description: "Explicit schema version and tie-break key",
    up: migrate_v2,
}];

/// A snapshot migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version the document has after this step
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// Rewrite applied to the top-level object
    pub up: fn(&mut Map<String, Value>),
}

/// V2: params gain `tieBreak`; v1 always broke ties by lowest mastery
fn migrate_v2(doc: &mut Map<String, Value>) {
    if let Some(Value::Object(params)) = doc.get_mut("params") {
        params
            .entry("tieBreak")
            .or_insert_with(|| Value::String("lowestMastery".to_string()));
    }
}

/// Schema version of a raw document.
///
/// Missing means legacy. A present but non-integer value is returned as
/// `None` and left for the typed decode to reject.
pub fn detect_version(doc: &Value) -> Option<u32> {
    match doc.get("schemaVersion") {
        None => Some(LEGACY_SCHEMA_VERSION),
        Some(v) => v.as_u64().and_then(|n| u32::try_from(n).ok()),
    }
}

/// Apply pending migrations to a document at `current_version`.
///
/// Returns the number of migrations applied.
pub fn apply_migrations(doc: &mut Value, current_version: u32) -> u32 {
    let Value::Object(map) = doc else {
        return 0;
    };

    let mut applied = 0;
    for migration in MIGRATIONS {
        if migration.version > current_version {
            warn!(
                "Migrating snapshot to v{}: {}",
                migration.version, migration.description
            );
            (migration.up)(map);
            map.insert("schemaVersion".to_string(), Value::from(migration.version));
            applied += 1;
        }
    }

    applied
}

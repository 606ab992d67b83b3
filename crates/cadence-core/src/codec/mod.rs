//! Serialization Codec
//!
//! Converts a session's learning state to and from [`SerializedSession`], a
//! closed, versioned record of plain values. This is the only shape the
//! persistence collaborator ever sees.
//!
//! Decoding always validates: a snapshot that breaks an engine invariant is
//! rejected, never clamped.

mod migrations;

pub use migrations::{LEGACY_SCHEMA_VERSION, MIGRATIONS, Migration};

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SnapshotError;
use crate::mastery::EngineParams;
use crate::session::SessionCounters;
use crate::state::{CardState, CardStateStore};

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 2;

/// Everything needed to resume a session exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedSession {
    /// Document schema version
    pub schema_version: u32,
    /// Engine parameters the states were scheduled with
    pub params: EngineParams,
    /// Session clock
    pub session_index: u64,
    /// Questions answered
    pub asked: u64,
    /// Questions answered correctly
    pub correct: u64,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Card states, sorted by id
    pub states: Vec<CardState>,
}

// ============================================================================
// ENCODE / DECODE
// ============================================================================

/// Capture store, counters and params as a snapshot
pub fn serialize(
    store: &CardStateStore,
    counters: &SessionCounters,
    params: &EngineParams,
) -> SerializedSession {
    let mut states: Vec<CardState> = store.all().cloned().collect();
    states.sort_by(|a, b| a.id.cmp(&b.id));

    SerializedSession {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        params: params.clone(),
        session_index: counters.session_index,
        asked: counters.asked,
        correct: counters.correct,
        started_at: counters.started_at,
        states,
    }
}

/// Validate a snapshot and rebuild store, counters and params from it.
///
/// Older schema versions are migrated first; newer ones are rejected.
pub fn deserialize(
    session: SerializedSession,
) -> Result<(CardStateStore, SessionCounters, EngineParams), SnapshotError> {
    let session = match session.schema_version {
        SNAPSHOT_SCHEMA_VERSION => session,
        found if found > SNAPSHOT_SCHEMA_VERSION => {
            return Err(SnapshotError::UnsupportedVersion {
                found,
                supported: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        _ => from_value(serde_json::to_value(&session)?)?,
    };

    validate(&session)?;

    let counters = SessionCounters {
        session_index: session.session_index,
        asked: session.asked,
        correct: session.correct,
        started_at: session.started_at,
    };
    let store = CardStateStore::from_states(session.states);

    Ok((store, counters, session.params))
}

/// Encode a snapshot as JSON
pub fn to_json(session: &SerializedSession) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Decode a snapshot from JSON, migrating older documents
pub fn from_json(json: &str) -> Result<SerializedSession, SnapshotError> {
    from_value(serde_json::from_str(json)?)
}

/// Decode a snapshot from a JSON value, migrating older documents.
///
/// Only the document shape is checked here; invariants are checked by
/// [`deserialize`].
pub fn from_value(mut doc: Value) -> Result<SerializedSession, SnapshotError> {
    if let Some(found) = migrations::detect_version(&doc) {
        if found > SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found,
                supported: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        migrations::apply_migrations(&mut doc, found);
    }

    Ok(serde_json::from_value(doc)?)
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate(session: &SerializedSession) -> Result<(), SnapshotError> {
    let params = &session.params;
    params.validate()?;

    if session.correct > session.asked {
        return Err(SnapshotError::Invariant(format!(
            "correct count {} exceeds asked count {}",
            session.correct, session.asked
        )));
    }

    let mut ids = HashSet::with_capacity(session.states.len());
    for state in &session.states {
        if !ids.insert(state.id.as_str()) {
            return Err(SnapshotError::Invariant(format!(
                "card {} is stored twice",
                state.id
            )));
        }
        validate_state(state, params, session.session_index)?;
    }

    Ok(())
}

fn validate_state(
    state: &CardState,
    params: &EngineParams,
    session_index: u64,
) -> Result<(), SnapshotError> {
    if state.mastery > params.max_mastery {
        return Err(SnapshotError::Invariant(format!(
            "card {} has mastery {} above maximum {}",
            state.id, state.mastery, params.max_mastery
        )));
    }

    if state.wrong_count > state.seen_count {
        return Err(SnapshotError::Invariant(format!(
            "card {} has {} wrong answers but was seen {} times",
            state.id, state.wrong_count, state.seen_count
        )));
    }

    // session index the card was last answered at
    let baseline = if state.seen_count == 0 {
        Some(state.next_due)
    } else {
        state.next_due.checked_sub(params.interval(state.mastery))
    };
    match baseline {
        Some(at) if at <= session_index => Ok(()),
        _ => Err(SnapshotError::Invariant(format!(
            "card {} is scheduled from a point after session index {}",
            state.id, session_index
        ))),
    }
}

// ============================================================================
// TESTS
// ============================================================================

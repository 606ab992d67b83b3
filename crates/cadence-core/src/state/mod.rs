//! Card State Store
//!
//! One mutable learning record per card id. Pure data: records are created
//! lazily the first time a card is answered, replaced wholesale by the
//! mastery transition, and never removed while a session is running.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// CARD STATE
// ============================================================================

/// Learning record for one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Card id this record belongs to
    pub id: String,
    /// Mastery level in `0..=max_mastery`
    pub mastery: u32,
    /// Times the card has been answered
    pub seen_count: u32,
    /// Times the card has been answered wrongly (never above `seen_count`)
    pub wrong_count: u32,
    /// Session index at which the card becomes eligible again
    pub next_due: u64,
}

impl CardState {
    /// Fresh record: nothing learned, due immediately.
    pub fn fresh(id: impl Into<String>, session_index: u64) -> Self {
        Self {
            id: id.into(),
            mastery: 0,
            seen_count: 0,
            wrong_count: 0,
            next_due: session_index,
        }
    }

    /// Whether the card is due at the given session index
    #[inline]
    pub fn is_due(&self, session_index: u64) -> bool {
        self.next_due <= session_index
    }

    /// Fraction of answers that were correct (0 when never seen)
    pub fn accuracy(&self) -> f64 {
        if self.seen_count == 0 {
            0.0
        } else {
            (self.seen_count - self.wrong_count) as f64 / self.seen_count as f64
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

/// In-memory table of card states keyed by card id.
///
/// Callers must only `put` states produced by
/// [`transition`](crate::mastery::transition); the store does no validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardStateStore {
    states: HashMap<String, CardState>,
}

impl CardStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records (later duplicates win)
    pub fn from_states(states: impl IntoIterator<Item = CardState>) -> Self {
        Self {
            states: states.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Record for a card, if it has been answered before
    pub fn get(&self, id: &str) -> Option<&CardState> {
        self.states.get(id)
    }

    /// Record for a card, creating a fresh one due at `session_index` if absent
    pub fn get_or_create(&mut self, id: &str, session_index: u64) -> &CardState {
        self.states
            .entry(id.to_string())
            .or_insert_with(|| CardState::fresh(id, session_index))
    }

    /// Replace the record for `id`
    pub fn put(&mut self, id: impl Into<String>, state: CardState) {
        self.states.insert(id.into(), state);
    }

    /// All records, in no particular order
    pub fn all(&self) -> impl Iterator<Item = &CardState> {
        self.states.values()
    }

    /// Whether a record exists for `id`
    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when no card has been answered yet
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop records matching `predicate`, returning the removed ids.
    ///
    /// Only used while a session is being restored, never mid-session.
    pub(crate) fn remove_where(&mut self, mut predicate: impl FnMut(&CardState) -> bool) -> Vec<String> {
        let doomed: Vec<String> = self
            .states
            .values()
            .filter(|s| predicate(s))
            .map(|s| s.id.clone())
            .collect();
        for id in &doomed {
            self.states.remove(id);
        }
        doomed
    }
}

// ============================================================================
// TESTS
// ============================================================================

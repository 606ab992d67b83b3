//! Progress Aggregator
//!
//! Read-side projections over a session, computed on demand. Nothing here
//! is cached and nothing mutates engine state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CardCatalog;
use crate::mastery::EngineParams;
use crate::session::{SessionController, SessionCounters};
use crate::state::{CardState, CardStateStore};

// ============================================================================
// TYPES
// ============================================================================

/// One catalog card joined with its learning record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProgress {
    /// Card id
    pub id: String,
    /// Prompt side
    pub front: String,
    /// Answer side
    pub back: String,
    /// Current mastery level (0 if never answered)
    pub mastery: u32,
    /// Times answered
    pub seen_count: u32,
    /// Times answered wrong
    pub wrong_count: u32,
}

/// Number of cards at one mastery level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelCount {
    /// Cards currently at the level
    pub count: usize,
}

/// Detailed progress for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDetailed {
    /// Cards in the catalog
    pub total: usize,
    /// `correct / asked` over the session, 0 before the first answer
    pub accuracy_overall: f64,
    /// Levels `1..=M`; level M holds the mastered cards
    pub mastery_levels: BTreeMap<u32, LevelCount>,
}

impl ProgressDetailed {
    /// Cards at maximum mastery
    pub fn mastered(&self) -> usize {
        self.mastery_levels
            .last_key_value()
            .map(|(_, level)| level.count)
            .unwrap_or(0)
    }
}

/// Derived per-library summary kept next to the snapshot by the
/// persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySummary {
    /// Cards in the catalog
    pub total: usize,
    /// Cards at maximum mastery
    pub mastered: usize,
    /// Cards answered at least once and not yet mastered
    pub learning: usize,
    /// Cards due now, never-answered cards included
    pub due: usize,
    /// `mastered / total` as a percentage
    pub percent_mastered: f64,
    /// Session accuracy
    pub accuracy_overall: f64,
    /// Sessions recorded for this library
    pub session_count: u32,
    /// Last time the library was studied
    pub last_accessed: DateTime<Utc>,
}

// ============================================================================
// PROJECTIONS
// ============================================================================

/// Every catalog card with its mastery and counts, in catalog order.
/// Cards never answered report zeros.
pub fn card_progress(catalog: &CardCatalog, store: &CardStateStore) -> Vec<CardProgress> {
    catalog
        .iter()
        .map(|card| {
            let state = store.get(&card.id);
            CardProgress {
                id: card.id.clone(),
                front: card.front.clone(),
                back: card.back.clone(),
                mastery: state.map_or(0, |s| s.mastery),
                seen_count: state.map_or(0, |s| s.seen_count),
                wrong_count: state.map_or(0, |s| s.wrong_count),
            }
        })
        .collect()
}

/// Stored learning records, in catalog order
pub fn all_states(catalog: &CardCatalog, store: &CardStateStore) -> Vec<CardState> {
    catalog
        .iter()
        .filter_map(|card| store.get(&card.id).cloned())
        .collect()
}

/// Per-level counts plus overall accuracy
pub fn progress_detailed(
    catalog: &CardCatalog,
    store: &CardStateStore,
    counters: &SessionCounters,
    params: &EngineParams,
) -> ProgressDetailed {
    let mut mastery_levels: BTreeMap<u32, LevelCount> = (1..=params.max_mastery)
        .map(|level| (level, LevelCount::default()))
        .collect();

    for state in all_states(catalog, store) {
        if let Some(level) = mastery_levels.get_mut(&state.mastery) {
            level.count += 1;
        }
    }

    ProgressDetailed {
        total: catalog.len(),
        accuracy_overall: counters.accuracy(),
        mastery_levels,
    }
}

impl SessionController {
    /// See [`card_progress`]
    pub fn card_progress(&self) -> Vec<CardProgress> {
        card_progress(self.catalog(), self.store())
    }

    /// See [`all_states`]
    pub fn all_states(&self) -> Vec<CardState> {
        all_states(self.catalog(), self.store())
    }

    /// See [`progress_detailed`]
    pub fn progress_detailed(&self) -> ProgressDetailed {
        progress_detailed(self.catalog(), self.store(), self.counters(), self.params())
    }

    /// Summary record for the persistence collaborator
    pub fn summary(&self, session_count: u32, last_accessed: DateTime<Utc>) -> LibrarySummary {
        let params = self.params();
        let states = self.all_states();

        let total = self.catalog().len();
        let mastered = states
            .iter()
            .filter(|s| params.is_mastered(s.mastery))
            .count();
        let learning = states
            .iter()
            .filter(|s| s.seen_count > 0 && !params.is_mastered(s.mastery))
            .count();
        let percent_mastered = if total == 0 {
            0.0
        } else {
            mastered as f64 / total as f64 * 100.0
        };

        LibrarySummary {
            total,
            mastered,
            learning,
            due: self.due_count(),
            percent_mastered,
            accuracy_overall: self.counters().accuracy(),
            session_count,
            last_accessed,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

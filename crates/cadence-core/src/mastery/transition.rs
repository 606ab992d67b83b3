//! Mastery transition function
//!
//! Given a card's current state and one answer, compute the next state.
//! Total over legal inputs: it never fails and always yields a legal state.
//!
//! ## Rule
//!
//! - `seen_count += 1`
//! - correct: `mastery = min(mastery + 1, M)`
//! - wrong: `wrong_count += 1`, `mastery = max(mastery - 1, 0)`
//! - `next_due = session_index + interval(mastery)`
//!
//! A wrong answer demotes one level instead of resetting to zero, so a
//! single lapse on a well-known card is not punished like a blank.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::params::EngineParams;
use crate::mode::QuestionMode;
use crate::state::CardState;

/// The outcome of one answer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    /// Whether the answer was accepted
    pub correct: bool,
    /// Mode the question was answered in
    pub mode: QuestionMode,
}

impl AnswerOutcome {
    /// Accepted answer
    pub fn correct(mode: QuestionMode) -> Self {
        Self { correct: true, mode }
    }

    /// Rejected answer
    pub fn wrong(mode: QuestionMode) -> Self {
        Self { correct: false, mode }
    }
}

/// Apply one answer to a card state.
///
/// `session_index` is the session clock at the time of the transition; the
/// controller advances it before calling this.
pub fn transition(
    state: &CardState,
    outcome: AnswerOutcome,
    session_index: u64,
    params: &EngineParams,
) -> CardState {
    debug_assert!(
        state.mastery <= params.max_mastery,
        "card {} has mastery {} above maximum {}",
        state.id,
        state.mastery,
        params.max_mastery
    );
    debug_assert!(
        state.wrong_count <= state.seen_count,
        "card {} has more wrong answers than answers",
        state.id
    );

    let mut next = state.clone();
    next.seen_count = state.seen_count.saturating_add(1);

    if outcome.correct {
        next.mastery = state.mastery.saturating_add(1).min(params.max_mastery);
    } else {
        next.wrong_count = state.wrong_count.saturating_add(1);
        next.mastery = state.mastery.saturating_sub(1);
    }

    next.next_due = session_index.saturating_add(params.interval(next.mastery));

    debug!(
        card_id = %state.id,
        correct = outcome.correct,
        mode = %outcome.mode,
        from = state.mastery,
        to = next.mastery,
        next_due = next.next_due,
        "mastery transition"
    );

    next
}

/// Whether a card has reached the maximum level
#[inline]
pub fn is_mastered(state: &CardState, params: &EngineParams) -> bool {
    params.is_mastered(state.mastery)
}

// ============================================================================
// TESTS
// ============================================================================

//! Session Controller
//!
//! Orchestrates one study session: owns the card state store and the
//! session counters, picks the next due card, asks the mode selector how to
//! present it, and feeds answers through the mastery transition.
//!
//! ```text
//! Initializing --start()--> Active --finish()--> Finished
//! ```
//!
//! The engine never decides a session is over; that is the caller's call.

mod types;

pub use types::{AnswerResult, Question, Response, SessionCounters, SessionPhase};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::catalog::{Card, CardCatalog};
use crate::codec::{self, SerializedSession};
use crate::error::{EngineError, Result};
use crate::mastery::{self, AnswerOutcome, EngineParams, TieBreak};
use crate::mode::{self, Capabilities, QuestionMode};
use crate::state::{CardState, CardStateStore};

/// A single study session over one library
#[derive(Debug, Clone)]
pub struct SessionController {
    catalog: CardCatalog,
    params: EngineParams,
    capabilities: Capabilities,
    store: CardStateStore,
    counters: SessionCounters,
    phase: SessionPhase,
}

impl SessionController {
    /// Prepare a fresh session. Configuration is validated here, before any
    /// question can be produced.
    pub fn new(
        catalog: CardCatalog,
        params: EngineParams,
        capabilities: Capabilities,
    ) -> Result<Self> {
        params.validate()?;
        capabilities.validate()?;

        Ok(Self {
            catalog,
            params,
            capabilities,
            store: CardStateStore::new(),
            counters: SessionCounters::new(Utc::now()),
            phase: SessionPhase::Initializing,
        })
    }

    /// Prepare a session that continues from a snapshot.
    ///
    /// Stored states for cards no longer in the catalog are dropped.
    pub fn resume(
        catalog: CardCatalog,
        snapshot: SerializedSession,
        capabilities: Capabilities,
    ) -> Result<Self> {
        capabilities.validate()?;
        let (mut store, counters, params) = codec::deserialize(snapshot)?;

        let orphans = store.remove_where(|s| !catalog.contains(&s.id));
        if !orphans.is_empty() {
            warn!(
                count = orphans.len(),
                ids = ?orphans,
                "Dropping stored states for cards missing from the catalog"
            );
        }

        Ok(Self {
            catalog,
            params,
            capabilities,
            store,
            counters,
            phase: SessionPhase::Initializing,
        })
    }

    /// Override the recorded start time (fresh sessions only)
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        if self.phase == SessionPhase::Initializing && self.counters.asked == 0 {
            self.counters.started_at = started_at;
        }
        self
    }

    /// Move from Initializing to Active
    pub fn start(&mut self) -> Result<()> {
        self.require(SessionPhase::Initializing)?;
        self.phase = SessionPhase::Active;
        info!(
            cards = self.catalog.len(),
            seen = self.store.len(),
            session_index = self.counters.session_index,
            "Study session started"
        );
        Ok(())
    }

    /// End the session. Snapshots remain available afterwards.
    pub fn finish(&mut self) {
        if self.phase != SessionPhase::Finished {
            info!(
                asked = self.counters.asked,
                correct = self.counters.correct,
                session_index = self.counters.session_index,
                "Study session finished"
            );
        }
        self.phase = SessionPhase::Finished;
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Session-wide counters
    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    /// Engine parameters in force
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Presentation capabilities in force
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The library's cards
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Learning records
    pub fn store(&self) -> &CardStateStore {
        &self.store
    }

    /// State for a card as the scheduler sees it: the stored record, or a
    /// fresh record due now for a card never answered.
    pub fn effective_state(&self, card_id: &str) -> Option<CardState> {
        if !self.catalog.contains(card_id) {
            return None;
        }
        Some(
            self.store
                .get(card_id)
                .cloned()
                .unwrap_or_else(|| CardState::fresh(card_id, self.counters.session_index)),
        )
    }

    /// Number of catalog cards due at the current session index
    pub fn due_count(&self) -> usize {
        self.candidates()
            .filter(|(_, state, _)| state.is_due(self.counters.session_index))
            .count()
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// The next question, or `None` when no card is due.
    ///
    /// Picks the smallest `next_due` among due cards, then the configured
    /// tie-break, then catalog order. Never mutates state.
    pub fn next_question(&self) -> Result<Option<Question>> {
        self.require(SessionPhase::Active)?;
        let index = self.counters.session_index;

        let pick = self
            .candidates()
            .filter(|(_, state, _)| state.is_due(index))
            .min_by_key(|(position, state, _)| self.sort_key(*position, state));

        Ok(pick.map(|(_, state, card)| self.build_question(card, &state)))
    }

    /// Like [`next_question`](Self::next_question), but when nothing is due
    /// returns the card that falls due soonest. `None` only before start.
    pub fn force_next_question(&self) -> Result<Option<Question>> {
        self.require(SessionPhase::Active)?;

        let pick = self
            .candidates()
            .min_by_key(|(position, state, _)| self.sort_key(*position, state));

        Ok(pick.map(|(_, state, card)| self.build_question(card, &state)))
    }

    /// Grade an answer, advance the session clock and update the card.
    pub fn submit_answer(&mut self, card_id: &str, response: Response) -> Result<AnswerResult> {
        self.require(SessionPhase::Active)?;
        let card = self
            .catalog
            .get(card_id)
            .ok_or_else(|| EngineError::UnknownCard(card_id.to_string()))?;

        let mode = response.mode();
        let correct = match &response {
            Response::Choice(choice) => *choice == card.back,
            Response::Typed(text) => mode::answers_match(&card.back, text),
        };
        let expected = card.back.clone();

        let before = self.counters.session_index;
        self.counters.asked += 1;
        if correct {
            self.counters.correct += 1;
        }
        self.counters.session_index += 1;

        let current = self.store.get_or_create(card_id, before).clone();
        let outcome = AnswerOutcome { correct, mode };
        let next = mastery::transition(&current, outcome, self.counters.session_index, &self.params);
        self.store.put(card_id, next.clone());

        Ok(AnswerResult {
            card_id: card_id.to_string(),
            mode,
            correct,
            expected,
            previous_mastery: current.mastery,
            mastered: mastery::is_mastered(&next, &self.params),
            state: next,
            session_index: self.counters.session_index,
        })
    }

    /// Capture everything needed to resume this session exactly.
    pub fn snapshot(&self) -> Result<SerializedSession> {
        if self.phase == SessionPhase::Initializing {
            return Err(EngineError::InvalidPhase {
                expected: SessionPhase::Active,
                actual: self.phase,
            });
        }
        Ok(codec::serialize(&self.store, &self.counters, &self.params))
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn require(&self, expected: SessionPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Every catalog card with its effective state, in catalog order
    fn candidates(&self) -> impl Iterator<Item = (usize, CardState, &Card)> + '_ {
        let index = self.counters.session_index;
        self.catalog.iter().enumerate().map(move |(position, card)| {
            let state = self
                .store
                .get(&card.id)
                .cloned()
                .unwrap_or_else(|| CardState::fresh(&card.id, index));
            (position, state, card)
        })
    }

    fn sort_key(&self, position: usize, state: &CardState) -> (u64, u64, usize) {
        let tie = match self.params.tie_break {
            TieBreak::LowestMastery => u64::from(state.mastery),
            TieBreak::MostWrong => u64::from(u32::MAX - state.wrong_count),
            TieBreak::FewestSeen => u64::from(state.seen_count),
        };
        (state.next_due, tie, position)
    }

    fn build_question(&self, card: &Card, state: &CardState) -> Question {
        let index = self.counters.session_index;
        let mode = mode::select_mode(state, &self.capabilities);
        let choices = match mode {
            QuestionMode::MultipleChoice => {
                mode::build_choices(&self.catalog, &card.id, self.capabilities.choice_count, index)
            }
            QuestionMode::Typed => Vec::new(),
        };

        Question {
            card_id: card.id.clone(),
            front: card.front.clone(),
            mode,
            choices,
            mastery: state.mastery,
            is_new: !self.store.contains(&card.id),
            session_index: index,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Question Mode Selector
//!
//! Decides per turn whether a card is asked as multiple-choice (recognition)
//! or typed (recall). Weak cards get recognition, strong cards get recall,
//! within whatever the session's capability flags allow.

mod normalize;

pub use normalize::{answers_match, normalize};

use serde::{Deserialize, Serialize};

use crate::catalog::CardCatalog;
use crate::error::ConfigError;
use crate::state::CardState;

/// Default mastery level from which typed recall is preferred
pub const DEFAULT_TYPED_FROM_LEVEL: u32 = 3;

/// Default number of options in a multiple-choice question
pub const DEFAULT_CHOICE_COUNT: usize = 4;

// ============================================================================
// QUESTION MODE
// ============================================================================

/// How a question is presented and answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionMode {
    /// Pick the answer from a list of options; exact match
    MultipleChoice,
    /// Type the answer; normalized match
    Typed,
}

impl QuestionMode {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionMode::MultipleChoice => "multipleChoice",
            QuestionMode::Typed => "typed",
        }
    }
}

impl std::fmt::Display for QuestionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CAPABILITIES
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_typed_from_level() -> u32 {
    DEFAULT_TYPED_FROM_LEVEL
}

fn default_choice_count() -> usize {
    DEFAULT_CHOICE_COUNT
}

/// Caller-supplied session preferences for question presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Multiple-choice questions may be asked
    #[serde(default = "default_true")]
    pub allow_multiple_choice: bool,
    /// Typed questions may be asked
    #[serde(default = "default_true")]
    pub allow_typed: bool,
    /// Mastery level at and above which typed recall is preferred
    #[serde(default = "default_typed_from_level")]
    pub typed_from_level: u32,
    /// Options offered per multiple-choice question (answer included)
    #[serde(default = "default_choice_count")]
    pub choice_count: usize,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            allow_multiple_choice: true,
            allow_typed: true,
            typed_from_level: DEFAULT_TYPED_FROM_LEVEL,
            choice_count: DEFAULT_CHOICE_COUNT,
        }
    }
}

impl Capabilities {
    /// Only multiple-choice questions
    pub fn multiple_choice_only() -> Self {
        Self {
            allow_typed: false,
            ..Self::default()
        }
    }

    /// Only typed questions
    pub fn typed_only() -> Self {
        Self {
            allow_multiple_choice: false,
            ..Self::default()
        }
    }

    /// Reject configurations the engine refuses to guess around
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.allow_multiple_choice && !self.allow_typed {
            return Err(ConfigError::NoQuestionModes);
        }
        if self.allow_multiple_choice && self.choice_count < 2 {
            return Err(ConfigError::ChoiceCountTooSmall(self.choice_count));
        }
        Ok(())
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Pick the presentation mode for a card.
///
/// A single enabled mode always wins. With both enabled, mastery below
/// `typed_from_level` gets multiple-choice, otherwise typed.
pub fn select_mode(state: &CardState, capabilities: &Capabilities) -> QuestionMode {
    match (capabilities.allow_multiple_choice, capabilities.allow_typed) {
        (true, false) => QuestionMode::MultipleChoice,
        (false, true) => QuestionMode::Typed,
        _ if state.mastery >= capabilities.typed_from_level => QuestionMode::Typed,
        _ => QuestionMode::MultipleChoice,
    }
}

/// Build the options for a multiple-choice question.
///
/// Distractors are the backs of the following catalog cards (wrapping),
/// skipping any that normalize to the same text as the answer or as an
/// option already taken. The answer's slot rotates with the session index,
/// so the layout is deterministic but not fixed.
pub fn build_choices(
    catalog: &CardCatalog,
    card_id: &str,
    choice_count: usize,
    session_index: u64,
) -> Vec<String> {
    let Some(position) = catalog.position(card_id) else {
        return Vec::new();
    };
    let cards = catalog.cards();
    let answer = cards[position].back.clone();

    let mut seen = vec![normalize(&answer)];
    let mut distractors: Vec<String> = Vec::with_capacity(choice_count.saturating_sub(1));

    for offset in 1..cards.len() {
        if distractors.len() + 1 >= choice_count {
            break;
        }
        let candidate = &cards[(position + offset) % cards.len()].back;
        let key = normalize(candidate);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        distractors.push(candidate.clone());
    }

    let slot = (session_index % (distractors.len() as u64 + 1)) as usize;
    distractors.insert(slot, answer);
    distractors
}

// ============================================================================
// TESTS
// ============================================================================

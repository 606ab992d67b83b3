//! Session value types: phase, counters, questions, responses, results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mode::QuestionMode;
use crate::state::CardState;

// ============================================================================
// PHASE
// ============================================================================

/// Lifecycle of a study session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Configured and validated, no question produced yet
    #[default]
    Initializing,
    /// Questions can be asked and answered
    Active,
    /// Ended by the caller
    Finished,
}

impl SessionPhase {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Initializing => "initializing",
            SessionPhase::Active => "active",
            SessionPhase::Finished => "finished",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// COUNTERS
// ============================================================================

/// Session-wide counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    /// Logical clock; advances by one per answered question
    pub session_index: u64,
    /// Questions answered
    pub asked: u64,
    /// Questions answered correctly
    pub correct: u64,
    /// When the session (or the session it resumes) began
    pub started_at: DateTime<Utc>,
}

impl SessionCounters {
    /// Zeroed counters starting at `started_at`
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            session_index: 0,
            asked: 0,
            correct: 0,
            started_at,
        }
    }

    /// `correct / asked`, 0 before the first answer
    pub fn accuracy(&self) -> f64 {
        if self.asked == 0 {
            0.0
        } else {
            self.correct as f64 / self.asked as f64
        }
    }
}

// ============================================================================
// QUESTION / RESPONSE / RESULT
// ============================================================================

/// A question ready to present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Card being asked
    pub card_id: String,
    /// Prompt side of the card
    pub front: String,
    /// Presentation mode
    pub mode: QuestionMode,
    /// Options for multiple-choice questions, empty for typed ones
    pub choices: Vec<String>,
    /// Card mastery when the question was built
    pub mastery: u32,
    /// Whether the card has never been answered
    pub is_new: bool,
    /// Session index the question was built at
    pub session_index: u64,
}

/// An answer given by the learner. The variant is the mode it was given in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode", content = "value")]
pub enum Response {
    /// Selected option text; must equal the card's back exactly
    Choice(String),
    /// Free text; compared after normalization
    Typed(String),
}

impl Response {
    /// Mode this response was given in
    pub fn mode(&self) -> QuestionMode {
        match self {
            Response::Choice(_) => QuestionMode::MultipleChoice,
            Response::Typed(_) => QuestionMode::Typed,
        }
    }

    /// Raw response text
    pub fn text(&self) -> &str {
        match self {
            Response::Choice(s) | Response::Typed(s) => s,
        }
    }
}

/// Result of submitting an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// Card answered
    pub card_id: String,
    /// Mode the answer was given in
    pub mode: QuestionMode,
    /// Whether the answer was accepted
    pub correct: bool,
    /// The card's back, for feedback
    pub expected: String,
    /// Mastery before the answer
    pub previous_mastery: u32,
    /// Card state after the transition
    pub state: CardState,
    /// Whether the card is now at maximum mastery
    pub mastered: bool,
    /// Session index after the answer
    pub session_index: u64,
}

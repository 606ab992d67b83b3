//! Engine error taxonomy
//!
//! Three families, matching how a failure has to be handled by the caller:
//! - [`ConfigError`]: the session was set up wrong; detected before the first question.
//! - [`SnapshotError`]: a stored snapshot is corrupt, malformed or from an unknown schema.
//! - [`EngineError`]: everything an operation on a live session can return.
//!
//! A card with nothing due is not an error: `next_question` returns `Ok(None)`.

use thiserror::Error;

use crate::session::SessionPhase;

/// Configuration errors, surfaced at session initialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The catalog contains no cards
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Two catalog cards share an id
    #[error("Duplicate card id in catalog: {0}")]
    DuplicateCard(String),

    /// A catalog card has an empty or whitespace-only id
    #[error("Catalog card at position {0} has a blank id")]
    BlankCardId(usize),

    /// Both multiple-choice and typed questions are disabled
    #[error("At least one question mode must be enabled")]
    NoQuestionModes,

    /// Multiple-choice questions need at least the answer and one distractor
    #[error("Choice count must be at least 2, got {0}")]
    ChoiceCountTooSmall(usize),

    /// Maximum mastery level must be positive
    #[error("Maximum mastery level must be at least 1")]
    ZeroMaxMastery,

    /// The interval table must have one entry per mastery level (0..=M)
    #[error("Interval table needs {expected} entries (one per mastery level), got {actual}")]
    IntervalTableLength {
        /// M + 1
        expected: usize,
        /// Entries supplied
        actual: usize,
    },

    /// Better-known cards must never come back sooner than weaker ones
    #[error("Interval table must be strictly increasing (level {level} does not exceed the level below it)")]
    IntervalTableNotIncreasing {
        /// First level whose interval does not exceed the previous one
        level: usize,
    },
}

/// Errors decoding or validating a serialized session.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot was written by a newer engine
    #[error("Unsupported snapshot schema version {found} (this engine understands up to {supported})")]
    UnsupportedVersion {
        /// Version found in the document
        found: u32,
        /// Newest version this build can read
        supported: u32,
    },

    /// Document does not have the snapshot shape
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Parameters stored in the snapshot are not a valid configuration
    #[error("Snapshot parameters are invalid: {0}")]
    Params(#[from] ConfigError),

    /// A stored value breaks an engine invariant
    #[error("Snapshot invariant violated: {0}")]
    Invariant(String),
}

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Session configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot could not be restored or produced
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Answer submitted for a card the catalog does not contain
    #[error("Card not found: {0}")]
    UnknownCard(String),

    /// Operation not allowed in the current session phase
    #[error("Session is {actual}, operation requires {expected}")]
    InvalidPhase {
        /// Phase the operation needs
        expected: SessionPhase,
        /// Phase the session is in
        actual: SessionPhase,
    },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

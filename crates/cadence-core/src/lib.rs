//! # Cadence Core
//!
//! Adaptive flashcard engine. Tracks a mastery level per card, schedules
//! re-presentation on a logical session clock, and picks between
//! multiple-choice recognition and typed recall as a card gets stronger.
//!
//! - **Mastery state machine**: one level up per correct answer, one level
//!   down per wrong answer, bounded to `0..=M`
//! - **Spaced re-presentation**: interval table indexed by mastery, measured
//!   in answered questions rather than wall-clock time
//! - **Adaptive question mode**: multiple-choice below a mastery threshold,
//!   typed above it, with forgiving answer normalization
//! - **Versioned snapshots**: exact pause/resume through a closed, migrated
//!   record
//!
//! The engine is synchronous and does no I/O. Persistence, calendars and
//! quiz generation live with the host application behind small seams
//! ([`SessionRepository`], [`ReminderPolicy`], [`normalize`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use cadence_core::prelude::*;
//!
//! # fn main() -> cadence_core::Result<()> {
//! let catalog = CardCatalog::new(vec![
//!     Card::new("fr", "Capital of France", "Paris"),
//!     Card::new("de", "Capital of Germany", "Berlin"),
//! ])?;
//!
//! let mut session = SessionController::new(catalog, EngineParams::default(), Capabilities::default())?;
//! session.start()?;
//!
//! while let Some(question) = session.next_question()? {
//!     let result = session.submit_answer(&question.card_id, Response::Typed("paris".into()))?;
//!     if result.correct {
//!         break;
//!     }
//! }
//!
//! let snapshot = session.snapshot()?;
//! assert_eq!(snapshot.asked, session.counters().asked);
//! # Ok(())
//! # }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod catalog;
pub mod codec;
pub mod error;
pub mod mastery;
pub mod mode;
pub mod progress;
pub mod reminder;
pub mod repository;
pub mod session;
pub mod state;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Errors
pub use error::{ConfigError, EngineError, Result, SnapshotError};

// Catalog and learning records
pub use catalog::{Card, CardCatalog};
pub use state::{CardState, CardStateStore};

// Mastery state machine
pub use mastery::{
    AnswerOutcome, DEFAULT_INTERVALS, DEFAULT_MAX_MASTERY, EngineParams, TieBreak, is_mastered,
    transition,
};

// Question modes
pub use mode::{
    Capabilities, DEFAULT_CHOICE_COUNT, DEFAULT_TYPED_FROM_LEVEL, QuestionMode, answers_match,
    build_choices, normalize, select_mode,
};

// Session
pub use session::{
    AnswerResult, Question, Response, SessionController, SessionCounters, SessionPhase,
};

// Progress
pub use progress::{
    CardProgress, LevelCount, LibrarySummary, ProgressDetailed, all_states, card_progress,
    progress_detailed,
};

// Snapshots
pub use codec::{SNAPSHOT_SCHEMA_VERSION, SerializedSession};

// Collaborator seams
pub use reminder::{Reminder, ReminderPolicy, ReminderRating, ReminderStatus};
pub use repository::{
    InMemoryRepository, LibraryKey, RepositoryError, SessionRepository, StoredSession,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        AnswerResult, Capabilities, Card, CardCatalog, CardState, ConfigError, EngineError,
        EngineParams, LibraryKey, LibrarySummary, ProgressDetailed, Question, QuestionMode,
        Response, Result, SerializedSession, SessionController, SessionPhase, SessionRepository,
        SnapshotError, StoredSession, TieBreak,
    };
}

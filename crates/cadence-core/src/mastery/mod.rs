//! Mastery State Machine
//!
//! Per-card mastery levels with spaced re-presentation driven by a logical
//! session clock instead of wall time. Better-known cards wait longer
//! before they come back.

mod params;
mod transition;

pub use params::{DEFAULT_INTERVALS, DEFAULT_MAX_MASTERY, EngineParams, TieBreak};
pub use transition::{AnswerOutcome, is_mastered, transition};

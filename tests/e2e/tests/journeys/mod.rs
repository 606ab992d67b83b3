//! Journey Tests
//!
//! Complete learner workflows through the public API:
//! - Learning a card to mastery and lapsing
//! - Which card comes next, and how it is asked
//! - Pausing, saving and resuming
//! - Progress reporting

mod mastery;
mod progress;
mod resume;
mod scheduling;

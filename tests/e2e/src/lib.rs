//! Cadence end-to-end test support
//!
//! - [`harness`]: session lifecycle driver with an in-memory repository
//! - [`mocks`]: catalog and learning-state factories

pub mod harness;
pub mod mocks;

pub use harness::TestSessionManager;
pub use mocks::TestDataFactory;

//! Test Session Manager
//!
//! Drives a session the way a host application would:
//! - Fresh sessions over a catalog, already started
//! - Scripted right/wrong answers
//! - Save through a repository (snapshot + summary) and reload from JSON
//! - Session counting across reloads

use cadence_core::{
    AnswerResult, Capabilities, CardCatalog, EngineParams, InMemoryRepository, LibraryKey,
    Question, Response, SessionController, SessionRepository, StoredSession,
};
use chrono::Utc;

/// Manager for one learner studying one library
///
/// # Example
///
/// ```rust,ignore
/// let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
/// harness.answer("fr", true);
/// harness.save();
/// harness.reload();
/// assert_eq!(harness.session.counters().asked, 1);
/// ```
pub struct TestSessionManager {
    /// The live session (Active after construction and after every reload)
    pub session: SessionController,
    /// Where snapshots go
    pub repository: InMemoryRepository,
    /// Key the snapshots are stored under
    pub key: LibraryKey,
    catalog: CardCatalog,
    capabilities: Capabilities,
    session_count: u32,
}

impl TestSessionManager {
    /// Start a fresh session with default capabilities
    pub fn new(catalog: CardCatalog, params: EngineParams) -> Self {
        Self::with_capabilities(catalog, params, Capabilities::default())
    }

    /// Start a fresh session with the given capabilities
    pub fn with_capabilities(
        catalog: CardCatalog,
        params: EngineParams,
        capabilities: Capabilities,
    ) -> Self {
        let mut session = SessionController::new(catalog.clone(), params, capabilities.clone())
            .expect("test session config is valid");
        session.start().expect("fresh session starts");

        Self {
            session,
            repository: InMemoryRepository::new(),
            key: LibraryKey::new("learner", "library"),
            catalog,
            capabilities,
            session_count: 0,
        }
    }

    // ========================================================================
    // ANSWERING
    // ========================================================================

    /// Answer `card_id` right or wrong with a typed response
    pub fn answer(&mut self, card_id: &str, correct: bool) -> AnswerResult {
        let back = self
            .catalog
            .get(card_id)
            .map(|c| c.back.clone())
            .expect("card exists in catalog");
        let text = if correct { back } else { format!("not {back}") };
        self.session
            .submit_answer(card_id, Response::Typed(text))
            .expect("answer accepted")
    }

    /// Ask the next due question and answer it; `None` when nothing is due
    pub fn answer_next(&mut self, correct: bool) -> Option<(Question, AnswerResult)> {
        let question = self.session.next_question().expect("session is active")?;
        let result = self.answer(&question.card_id, correct);
        Some((question, result))
    }

    /// Answer whatever comes next, reviewing ahead when nothing is due
    pub fn answer_forced(&mut self, correct: bool) -> (Question, AnswerResult) {
        let question = self
            .session
            .force_next_question()
            .expect("session is active")
            .expect("catalog is not empty");
        let result = self.answer(&question.card_id, correct);
        (question, result)
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Snapshot and summary into the repository, counting one session
    pub fn save(&mut self) -> StoredSession {
        self.session_count += 1;
        let stored = StoredSession {
            session: self.session.snapshot().expect("snapshot available"),
            summary: self.session.summary(self.session_count, Utc::now()),
        };
        self.repository
            .save(&self.key, &stored)
            .expect("in-memory save succeeds");
        stored
    }

    /// Last saved document
    pub fn stored(&self) -> Option<StoredSession> {
        self.repository.load(&self.key).expect("in-memory load succeeds")
    }

    /// Replace the live session with one resumed from the saved document,
    /// passed through its JSON form
    pub fn reload(&mut self) {
        self.reload_with_catalog(self.catalog.clone());
    }

    /// Like [`reload`](Self::reload), against a different catalog
    pub fn reload_with_catalog(&mut self, catalog: CardCatalog) {
        let stored = self.stored().expect("a session was saved");
        let json = stored.to_json().expect("stored session encodes");
        let decoded = StoredSession::from_json(&json).expect("stored session decodes");

        let mut session =
            SessionController::resume(catalog.clone(), decoded.session, self.capabilities.clone())
                .expect("saved session resumes");
        session.start().expect("resumed session starts");

        self.session = session;
        self.catalog = catalog;
    }

    /// Sessions saved so far
    pub fn session_count(&self) -> u32 {
        self.session_count
    }
}

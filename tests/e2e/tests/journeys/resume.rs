//! Pausing, saving and resuming sessions.

use cadence_core::{
    Capabilities, Card, CardCatalog, EngineError, EngineParams, SessionController, SnapshotError,
    TieBreak, codec,
};
use cadence_e2e_tests::{TestDataFactory, TestSessionManager};

/// Right, right, wrong, repeated
fn script(step: usize) -> bool {
    step % 3 != 2
}

#[test]
fn test_resume_restores_everything_exactly() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    for step in 0..9 {
        harness.answer_forced(script(step));
    }

    let counters = harness.session.counters().clone();
    let store = harness.session.store().clone();
    let next = harness.session.next_question().unwrap();
    harness.save();
    harness.reload();

    assert_eq!(harness.session.counters(), &counters);
    assert_eq!(harness.session.store(), &store);
    assert_eq!(harness.session.next_question().unwrap(), next);
}

#[test]
fn test_resumed_session_continues_like_an_uninterrupted_one() {
    let params = EngineParams::default().with_tie_break(TieBreak::MostWrong);
    let mut paused = TestSessionManager::new(TestDataFactory::capitals(), params.clone());
    let mut straight = TestSessionManager::new(TestDataFactory::capitals(), params);

    for step in 0..20 {
        if step == 7 || step == 13 {
            paused.save();
            paused.reload();
        }
        let (a, ra) = paused.answer_forced(script(step));
        let (b, rb) = straight.answer_forced(script(step));
        assert_eq!(a, b, "diverged at step {step}");
        assert_eq!(ra, rb);
    }
    assert_eq!(paused.session.store(), straight.session.store());
}

#[test]
fn test_snapshot_after_finish() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    harness.answer("fr", true);
    harness.session.finish();
    let stored = harness.save();
    assert_eq!(stored.session.asked, 1);
    assert_eq!(stored.summary.session_count, 1);
}

#[test]
fn test_session_count_grows_per_save() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    harness.answer("fr", true);
    harness.save();
    harness.reload();
    harness.answer("de", true);
    harness.save();
    assert_eq!(harness.stored().unwrap().summary.session_count, 2);
    assert_eq!(harness.session_count(), 2);
}

#[test]
fn test_legacy_snapshot_resumes() {
    let snapshot = codec::from_value(TestDataFactory::legacy_capitals_snapshot()).unwrap();
    assert_eq!(snapshot.params.tie_break, TieBreak::LowestMastery);

    let mut session =
        SessionController::resume(TestDataFactory::capitals(), snapshot, Capabilities::default())
            .unwrap();
    session.start().unwrap();
    assert_eq!(session.counters().started_at, TestDataFactory::fixed_time());

    // de has been overdue since 3
    let question = session.next_question().unwrap().unwrap();
    assert_eq!(question.card_id, "de");
    assert_eq!(session.store().get("fr").map(|s| s.mastery), Some(3));
}

#[test]
fn test_snapshot_from_a_newer_engine_is_refused() {
    let mut doc = TestDataFactory::legacy_capitals_snapshot();
    doc["schemaVersion"] = serde_json::json!(99);
    let err = codec::from_value(doc).unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::UnsupportedVersion { found: 99, .. }
    ));
}

#[test]
fn test_corrupt_snapshot_fails_loudly() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    harness.answer("fr", true);
    let mut snapshot = harness.session.snapshot().unwrap();
    snapshot.states[0].mastery = 9;

    let err = SessionController::resume(TestDataFactory::capitals(), snapshot, Capabilities::default())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Snapshot(SnapshotError::Invariant(_))
    ));
}

#[test]
fn test_rewound_clock_is_rejected() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    harness.answer("fr", true);
    harness.answer("de", true);
    let mut snapshot = harness.session.snapshot().unwrap();
    snapshot.session_index = 0;

    let err = SessionController::resume(TestDataFactory::capitals(), snapshot, Capabilities::default())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Snapshot(SnapshotError::Invariant(_))
    ));
}

#[test]
fn test_removed_cards_are_forgotten_on_resume() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    harness.answer("fr", true);
    harness.answer("ro", false);
    harness.save();

    let trimmed = CardCatalog::new(vec![
        Card::new("fr", "Capital of France", "Paris"),
        Card::new("nl", "Capital of the Netherlands", "Amsterdam"),
    ])
    .unwrap();
    harness.reload_with_catalog(trimmed);

    assert!(harness.session.store().contains("fr"));
    assert!(!harness.session.store().contains("ro"));
    assert_eq!(harness.session.counters().asked, 2);

    // the new card is a fresh candidate
    let question = harness.session.next_question().unwrap().unwrap();
    assert_eq!(question.card_id, "nl");
    assert!(question.is_new);
}

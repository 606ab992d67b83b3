//! Progress reporting over real sessions.

use cadence_core::{Capabilities, EngineParams, SessionController, SessionCounters, codec};
use cadence_e2e_tests::{TestDataFactory, TestSessionManager};
use chrono::Utc;

fn session_from_levels(levels: &[u32]) -> SessionController {
    let params = EngineParams::default();
    let store = TestDataFactory::store_at_levels(levels);
    let counters = SessionCounters::new(TestDataFactory::fixed_time());
    let snapshot = codec::serialize(&store, &counters, &params);
    SessionController::resume(
        TestDataFactory::numbered_catalog(levels.len()),
        snapshot,
        Capabilities::default(),
    )
    .expect("generated snapshot is valid")
}

#[test]
fn test_ten_cards_four_mastered() {
    let session = session_from_levels(&[5, 1, 5, 2, 3, 5, 4, 1, 5, 2]);
    let detailed = session.progress_detailed();

    assert_eq!(detailed.total, 10);
    assert_eq!(detailed.mastery_levels[&5].count, 4);
    let below: usize = (1..=4).map(|level| detailed.mastery_levels[&level].count).sum();
    assert_eq!(below, 6);
    assert_eq!(detailed.mastery_levels[&1].count, 2);
    assert_eq!(detailed.mastery_levels[&2].count, 2);
    assert_eq!(detailed.accuracy_overall, 0.0);
}

#[test]
fn test_unseen_cards_are_not_bucketed() {
    let session = session_from_levels(&[0, 2]);
    let detailed = session.progress_detailed();
    let bucketed: usize = detailed.mastery_levels.values().map(|l| l.count).sum();
    assert_eq!(detailed.total, 2);
    assert_eq!(bucketed, 1);
}

#[test]
fn test_summary_tracks_a_study_run() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    for _ in 0..5 {
        harness.answer("fr", true);
    }
    harness.answer("de", true);
    harness.answer("it", false);

    let stored = harness.save();
    let summary = stored.summary;
    assert_eq!(summary.total, 6);
    assert_eq!(summary.mastered, 1);
    assert_eq!(summary.learning, 2);
    // index 7: it due 8, es/pt/ro never answered
    assert_eq!(summary.due, 3);
    assert!((summary.percent_mastered - 100.0 / 6.0).abs() < 1e-9);
    assert!((summary.accuracy_overall - 6.0 / 7.0).abs() < 1e-9);
    assert!(summary.last_accessed <= Utc::now());
}

#[test]
fn test_card_progress_lists_whole_catalog() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    harness.answer("es", false);
    harness.answer("es", true);

    let rows = harness.session.card_progress();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].id, "fr");
    let es = rows.iter().find(|r| r.id == "es").unwrap();
    assert_eq!((es.mastery, es.seen_count, es.wrong_count), (1, 2, 1));
    assert_eq!(es.back, "Madrid");

    let states = harness.session.all_states();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].id, "es");
}

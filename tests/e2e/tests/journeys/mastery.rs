//! Learning a card up to mastery, and what a lapse costs.

use cadence_core::{EngineParams, QuestionMode};
use cadence_e2e_tests::{TestDataFactory, TestSessionManager};

#[test]
fn test_five_correct_answers_master_a_fresh_card() {
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(1), EngineParams::default());

    let mut last = None;
    for _ in 0..5 {
        last = Some(harness.answer("card-0", true));
    }
    let last = last.unwrap();
    assert_eq!(last.state.mastery, 5);
    assert_eq!(last.state.seen_count, 5);
    assert!(last.mastered);

    let detailed = harness.session.progress_detailed();
    assert_eq!(detailed.mastery_levels[&5].count, 1);
    assert_eq!(detailed.mastered(), 1);
    assert!((detailed.accuracy_overall - 1.0).abs() < 1e-9);
}

#[test]
fn test_mastery_stops_at_maximum() {
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(1), EngineParams::default());
    for _ in 0..12 {
        harness.answer("card-0", true);
    }
    let state = harness.session.store().get("card-0").cloned().unwrap();
    assert_eq!(state.mastery, 5);
    assert_eq!(state.seen_count, 12);
}

#[test]
fn test_lapse_at_level_three_drops_one_level_and_comes_back_sooner() {
    let params = EngineParams::default();
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(2), params.clone());
    for _ in 0..3 {
        harness.answer("card-0", true);
    }
    assert_eq!(harness.session.store().get("card-0").map(|s| s.mastery), Some(3));

    let result = harness.answer("card-0", false);
    let index = harness.session.counters().session_index;
    assert_eq!(result.previous_mastery, 3);
    assert_eq!(result.state.mastery, 2);
    assert_eq!(result.state.wrong_count, 1);
    assert_eq!(result.state.next_due, index + params.interval(2));
    assert!(result.state.next_due < index + params.interval(3));
    assert!(!result.mastered);
}

#[test]
fn test_wrong_answers_never_go_below_zero() {
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(1), EngineParams::default());
    for _ in 0..3 {
        let result = harness.answer("card-0", false);
        assert_eq!(result.state.mastery, 0);
    }
    let state = harness.session.store().get("card-0").cloned().unwrap();
    assert_eq!((state.seen_count, state.wrong_count), (3, 3));
}

#[test]
fn test_recognition_gives_way_to_recall() {
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(1), EngineParams::default());

    let (question, _) = harness.answer_forced(true);
    assert_eq!(question.mode, QuestionMode::MultipleChoice);
    assert!(question.choices.contains(&"Answer 0".to_string()));

    harness.answer_forced(true);
    harness.answer_forced(true);

    // mastery 3 reaches the default typed threshold
    let (question, result) = harness.answer_forced(true);
    assert_eq!(question.mastery, 3);
    assert_eq!(question.mode, QuestionMode::Typed);
    assert!(question.choices.is_empty());
    assert_eq!(result.mode, QuestionMode::Typed);
}

#[test]
fn test_typed_recall_forgives_case_spacing_and_accents() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    let result = harness
        .session
        .submit_answer("ro", cadence_core::Response::Typed("  BUCURESTI ".into()))
        .unwrap();
    assert!(result.correct);

    // multiple-choice wants the exact option
    let result = harness
        .session
        .submit_answer("fr", cadence_core::Response::Choice("paris".into()))
        .unwrap();
    assert!(!result.correct);
}

//! Which card comes next, and how it is asked.

use cadence_core::{Capabilities, EngineParams, QuestionMode, TieBreak};
use cadence_e2e_tests::{TestDataFactory, TestSessionManager};

#[test]
fn test_first_pass_follows_catalog_then_overdue_cards_cut_in() {
    let mut harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());

    let mut order = Vec::new();
    for _ in 0..5 {
        let (question, _) = harness.answer_next(true).expect("a card is due");
        order.push(question.card_id);
    }
    // fr is due again at 3 alongside fresh es (weaker, so first), and
    // overdue at 4 ahead of fresh pt
    assert_eq!(order, vec!["fr", "de", "it", "es", "fr"]);
}

#[test]
fn test_nothing_due_is_not_an_error() {
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(2), EngineParams::default());
    harness.answer("card-0", true);
    harness.answer("card-1", true);

    assert!(harness.session.next_question().unwrap().is_none());
    assert!(harness.answer_next(true).is_none());

    // the host may still review ahead
    let (question, _) = harness.answer_forced(true);
    assert_eq!(question.card_id, "card-0");
}

#[test]
fn test_missed_card_returns_before_known_ones() {
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(4), EngineParams::default());
    harness.answer("card-0", false); // due 1 + 1
    harness.answer("card-1", true); // due 2 + 2
    harness.answer("card-2", true); // due 3 + 2

    // index 3: card-0 overdue since 2, card-3 fresh at 3
    let question = harness.session.next_question().unwrap().unwrap();
    assert_eq!(question.card_id, "card-0");
    assert!(!question.is_new);
}

fn tie_break_pick(tie_break: TieBreak, missed: &str) -> String {
    let params = EngineParams::default()
        .with_intervals(vec![0, 10, 20, 30, 40, 50])
        .with_tie_break(tie_break);
    let mut harness = TestSessionManager::new(TestDataFactory::numbered_catalog(2), params);
    // a zero level-0 interval keeps the missed card due right away
    harness.answer(missed, false);
    harness.answer(missed, false);
    harness.session.next_question().unwrap().unwrap().card_id
}

#[test]
fn test_tie_break_is_configurable() {
    // card-0 missed twice, card-1 fresh; both due at index 2 with mastery 0
    assert_eq!(tie_break_pick(TieBreak::LowestMastery, "card-0"), "card-0");
    assert_eq!(tie_break_pick(TieBreak::MostWrong, "card-0"), "card-0");
    assert_eq!(tie_break_pick(TieBreak::FewestSeen, "card-0"), "card-1");

    // card-1 missed twice, card-0 fresh
    assert_eq!(tie_break_pick(TieBreak::LowestMastery, "card-1"), "card-0");
    assert_eq!(tie_break_pick(TieBreak::MostWrong, "card-1"), "card-1");
    assert_eq!(tie_break_pick(TieBreak::FewestSeen, "card-1"), "card-0");
}

#[test]
fn test_capabilities_override_mastery() {
    let mut typed = TestSessionManager::with_capabilities(
        TestDataFactory::capitals(),
        EngineParams::default(),
        Capabilities::typed_only(),
    );
    let (question, _) = typed.answer_next(true).unwrap();
    assert_eq!(question.mastery, 0);
    assert_eq!(question.mode, QuestionMode::Typed);

    let mut choice = TestSessionManager::with_capabilities(
        TestDataFactory::numbered_catalog(1),
        EngineParams::default(),
        Capabilities::multiple_choice_only(),
    );
    for _ in 0..5 {
        choice.answer_forced(true);
    }
    let (question, _) = choice.answer_forced(true);
    assert_eq!(question.mastery, 5);
    assert_eq!(question.mode, QuestionMode::MultipleChoice);
}

#[test]
fn test_choices_are_distinct_and_contain_the_answer() {
    let harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    let question = harness.session.next_question().unwrap().unwrap();
    assert_eq!(question.mode, QuestionMode::MultipleChoice);
    assert_eq!(question.choices.len(), 4);
    assert!(question.choices.contains(&"Paris".to_string()));

    let mut unique = question.choices.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 4);
}

#[test]
fn test_questions_do_not_change_state() {
    let harness = TestSessionManager::new(TestDataFactory::capitals(), EngineParams::default());
    let first = harness.session.next_question().unwrap();
    let second = harness.session.next_question().unwrap();
    assert_eq!(first, second);
    assert!(harness.session.store().is_empty());
    assert_eq!(harness.session.counters().session_index, 0);
}

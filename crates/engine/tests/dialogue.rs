use engine::{DialogueEvent, Engine, EngineError, MoneyCents, OTHER_BUCKET};

const ALICE: u64 = 1001;
const BOB: u64 = 1002;

async fn add_expense(engine: &Engine, user_id: u64, amount: &str, category: &str, note: &str) {
    engine.begin_dialogue(user_id).await;
    assert_eq!(
        engine.dialogue_turn(user_id, amount).await,
        DialogueEvent::AskCategory
    );
    assert_eq!(
        engine.dialogue_turn(user_id, category).await,
        DialogueEvent::AskNote
    );
    assert!(matches!(
        engine.dialogue_turn(user_id, note).await,
        DialogueEvent::Committed { .. }
    ));
}

#[tokio::test]
async fn full_dialogue_commits_exactly_one_record() {
    let engine = Engine::builder().build();

    engine.begin_dialogue(ALICE).await;
    engine.dialogue_turn(ALICE, "12.50").await;
    engine.dialogue_turn(ALICE, "Food").await;
    let event = engine.dialogue_turn(ALICE, "lunch with Bob").await;

    let DialogueEvent::Committed {
        record,
        total_entries,
    } = event
    else {
        panic!("dialogue did not commit: {event:?}");
    };
    assert_eq!(total_entries, 1);
    assert_eq!(record.user_id, ALICE);
    assert_eq!(record.amount, MoneyCents::new(1250));
    assert_eq!(record.category, "Food");
    assert_eq!(record.note.as_deref(), Some("lunch with Bob"));

    // Session is back to idle and the ledger holds exactly that record.
    assert!(!engine.in_dialogue(ALICE).await);
    let records = engine.records(ALICE).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, record.id);
}

#[tokio::test]
async fn invalid_amount_leaves_ledger_and_stage_alone() {
    let engine = Engine::builder().build();

    engine.begin_dialogue(ALICE).await;
    let event = engine.dialogue_turn(ALICE, "twelve fifty").await;

    assert!(matches!(
        event,
        DialogueEvent::Rejected(EngineError::InvalidAmount(_))
    ));
    assert!(engine.in_dialogue(ALICE).await);
    assert!(engine.records(ALICE).await.is_empty());

    // Still waiting for the amount: a valid retry advances to category.
    assert_eq!(
        engine.dialogue_turn(ALICE, "12.50").await,
        DialogueEvent::AskCategory
    );
}

#[tokio::test]
async fn cancel_mid_dialogue_discards_partial_input() {
    let engine = Engine::builder().build();

    engine.begin_dialogue(ALICE).await;
    engine.dialogue_turn(ALICE, "12.50").await;
    engine.dialogue_turn(ALICE, "Food").await;

    assert!(engine.cancel_dialogue(ALICE).await);
    assert!(!engine.in_dialogue(ALICE).await);
    assert!(engine.records(ALICE).await.is_empty());

    // Cancelling again is a no-op, not an error.
    assert!(!engine.cancel_dialogue(ALICE).await);
}

#[tokio::test]
async fn begin_after_stale_dialogue_reports_the_discard() {
    let engine = Engine::builder().build();

    assert!(!engine.begin_dialogue(ALICE).await);
    engine.dialogue_turn(ALICE, "3").await;

    // The abandoned dialogue is replaced, not resumed.
    assert!(engine.begin_dialogue(ALICE).await);
    assert_eq!(
        engine.dialogue_turn(ALICE, "5").await,
        DialogueEvent::AskCategory
    );
}

#[tokio::test]
async fn report_matches_the_documented_scenario() {
    let engine = Engine::builder().build();
    add_expense(&engine, ALICE, "12.50", "Food", "-").await;
    add_expense(&engine, ALICE, "7.00", "Food", "-").await;
    add_expense(&engine, ALICE, "3.00", "Transport", "-").await;

    engine.set_unlocked(ALICE, true).await;
    let report = engine.report(ALICE).await;

    assert_eq!(report.total_spent, MoneyCents::new(2250));
    assert_eq!(report.entry_count, 3);
    assert!(report.is_full);
    assert_eq!(report.by_category.len(), 2);
    assert_eq!(report.by_category[0].category, "Food");
    assert_eq!(report.by_category[0].subtotal, MoneyCents::new(1950));
    assert_eq!(report.by_category[1].category, "Transport");
    assert_eq!(report.by_category[1].subtotal, MoneyCents::new(300));
}

#[tokio::test]
async fn locked_report_redacts_but_keeps_the_total() {
    let engine = Engine::builder().preview_categories(1).build();
    add_expense(&engine, ALICE, "12.50", "Food", "-").await;
    add_expense(&engine, ALICE, "7.00", "Food", "-").await;
    add_expense(&engine, ALICE, "3.00", "Transport", "-").await;

    let locked = engine.report(ALICE).await;
    assert!(!locked.is_full);
    assert_eq!(locked.total_spent, MoneyCents::new(2250));
    assert_eq!(locked.by_category.len(), 2);
    assert_eq!(locked.by_category[0].category, "Food");
    assert_eq!(locked.by_category[0].subtotal, MoneyCents::new(1950));
    assert_eq!(locked.by_category[1].category, OTHER_BUCKET);
    assert_eq!(locked.by_category[1].subtotal, MoneyCents::new(300));

    engine.set_unlocked(ALICE, true).await;
    let full = engine.report(ALICE).await;
    assert!(full.is_full);
    assert_eq!(full.total_spent, locked.total_spent);
}

#[tokio::test]
async fn unknown_user_gets_the_empty_report() {
    let engine = Engine::builder().build();
    let report = engine.report(424_242).await;

    assert_eq!(report.total_spent, MoneyCents::ZERO);
    assert_eq!(report.entry_count, 0);
    assert!(report.by_category.is_empty());
    assert!(!report.is_full);
}

#[tokio::test]
async fn concurrent_users_never_leak_into_each_other() {
    let engine = std::sync::Arc::new(Engine::builder().build());

    let a = {
        let engine = engine.clone();
        tokio::spawn(async move {
            for _ in 0..50 {
                add_expense(&engine, ALICE, "1.00", "Food", "-").await;
            }
        })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move {
            for _ in 0..50 {
                add_expense(&engine, BOB, "2.00", "Games", "-").await;
            }
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    let alice = engine.records(ALICE).await;
    let bob = engine.records(BOB).await;
    assert_eq!(alice.len(), 50);
    assert_eq!(bob.len(), 50);
    assert!(alice.iter().all(|r| r.user_id == ALICE && r.category == "Food"));
    assert!(bob.iter().all(|r| r.user_id == BOB && r.category == "Games"));

    engine.set_unlocked(ALICE, true).await;
    let report = engine.report(ALICE).await;
    assert_eq!(report.total_spent, MoneyCents::new(5000));
    assert_eq!(report.entry_count, 50);
}

#[tokio::test]
async fn unlock_is_per_user_and_never_resets() {
    let engine = Engine::builder().build();

    assert!(!engine.is_unlocked(ALICE).await);
    engine.set_unlocked(ALICE, true).await;
    engine.set_unlocked(ALICE, true).await;
    assert!(engine.is_unlocked(ALICE).await);
    assert!(!engine.is_unlocked(BOB).await);

    // Adding more expenses does not touch the flag.
    add_expense(&engine, ALICE, "4", "misc", "-").await;
    assert!(engine.is_unlocked(ALICE).await);
}

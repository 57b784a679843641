mod helpers;

use helpers::test_store;
use laponia::store::ConversationTurn;

#[test]
fn save_knowledge_upsert_replaces_value() {
    let store = test_store();

    assert!(store.save_knowledge("fatos", "capital", "Lyon"));
    assert!(store.save_knowledge("fatos", "capital", "Paris"));

    assert_eq!(
        store.get_knowledge("fatos", "capital"),
        Some("Paris".to_string())
    );
}

#[test]
fn save_knowledge_is_idempotent_under_replay() {
    let store = test_store();

    assert!(store.save_knowledge("fatos", "capital", "Paris"));
    assert!(store.save_knowledge("fatos", "capital", "Paris"));

    assert_eq!(
        store.get_knowledge("fatos", "capital"),
        Some("Paris".to_string())
    );
}

#[test]
fn knowledge_never_written_is_absent() {
    let store = test_store();
    assert_eq!(store.get_knowledge("fatos", "inexistente"), None);
}

#[test]
fn same_key_in_different_categories_is_distinct() {
    let store = test_store();

    store.save_knowledge("fatos", "capital", "Paris");
    store.save_knowledge("geografia", "capital", "Brasília");

    assert_eq!(
        store.get_knowledge("fatos", "capital"),
        Some("Paris".to_string())
    );
    assert_eq!(
        store.get_knowledge("geografia", "capital"),
        Some("Brasília".to_string())
    );
}

#[test]
fn history_is_newest_first_and_bounded() {
    let store = test_store();

    assert!(store.save_conversation("m1", "r1"));
    assert!(store.save_conversation("m2", "r2"));
    assert!(store.save_conversation("m3", "r3"));

    let turns = store.get_conversation_history(2);
    assert_eq!(
        turns,
        vec![
            ConversationTurn {
                user_message: "m3".into(),
                ai_response: "r3".into(),
            },
            ConversationTurn {
                user_message: "m2".into(),
                ai_response: "r2".into(),
            },
        ]
    );
}

#[test]
fn empty_history_is_valid() {
    let store = test_store();
    assert!(store.get_conversation_history(10).is_empty());
}

#[test]
fn history_limit_larger_than_rows_returns_all() {
    let store = test_store();
    store.save_conversation("m1", "r1");

    let turns = store.get_conversation_history(100);
    assert_eq!(turns.len(), 1);
}

#[test]
fn concurrent_saves_are_serialized() {
    let store = test_store();
    let threads = 8;
    let saves_per_thread = 5;

    std::thread::scope(|s| {
        for t in 0..threads {
            let store = &store;
            s.spawn(move || {
                for i in 0..saves_per_thread {
                    assert!(store.save_conversation(
                        &format!("msg-{t}-{i}"),
                        &format!("resp-{t}-{i}")
                    ));
                }
            });
        }
    });

    let turns = store.get_conversation_history(1000);
    assert_eq!(turns.len(), threads * saves_per_thread);
}

//! Property-based tests for message ordering in the in-memory store

use chatline::backend::store::{MemoryStore, MessageStore, NewMessage};
use chatline::shared::Message;
use proptest::prelude::*;
use uuid::Uuid;

/// `(from_alice, deleted)` per generated message
fn message_specs() -> impl Strategy<Value = Vec<(bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 0..40)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Append the generated messages and return them in insertion order
async fn seed(store: &MemoryStore, alice: Uuid, bob: Uuid, specs: &[(bool, bool)]) -> Vec<Message> {
    let mut inserted = Vec::new();
    for (index, (from_alice, deleted)) in specs.iter().enumerate() {
        let (sender, receiver) = if *from_alice { (alice, bob) } else { (bob, alice) };
        let mut stored = store
            .append(NewMessage::new(sender, receiver, format!("message {index}")))
            .await
            .unwrap();
        if *deleted {
            stored = store.soft_delete(stored.id).await.unwrap().unwrap();
        }
        inserted.push(stored);
    }
    inserted
}

proptest! {
    #[test]
    fn test_stamps_increase_with_insertion(specs in message_specs()) {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
            let inserted = seed(&store, alice, bob, &specs).await;

            assert!(inserted.windows(2).all(|pair| pair[0].created_at < pair[1].created_at));
        });
    }

    #[test]
    fn test_conversation_is_insertion_order_from_both_sides(specs in message_specs()) {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
            let expected = seed(&store, alice, bob, &specs).await;

            let forward = store.conversation(alice, bob, true).await.unwrap();
            let backward = store.conversation(bob, alice, true).await.unwrap();

            assert_eq!(forward, expected);
            assert_eq!(backward, expected);
        });
    }

    #[test]
    fn test_conversation_hides_deleted_by_default(specs in message_specs()) {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
            seed(&store, alice, bob, &specs).await;

            let visible = store.conversation(alice, bob, false).await.unwrap();
            let all = store.conversation(alice, bob, true).await.unwrap();

            let expected: Vec<_> = all.into_iter().filter(|m| !m.is_deleted).collect();
            assert_eq!(visible, expected);
        });
    }

    #[test]
    fn test_messages_since_filters_conversation(
        specs in message_specs(),
        cut in 0usize..41,
    ) {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
            let inserted = seed(&store, alice, bob, &specs).await;
            let since = inserted.get(cut).map_or(0, |m| m.created_at);

            let expected: Vec<_> = store
                .conversation(alice, bob, false)
                .await
                .unwrap()
                .into_iter()
                .filter(|m| m.created_at > since)
                .collect();
            let polled = store.messages_since(bob, alice, since).await.unwrap();

            assert_eq!(polled, expected);
        });
    }

    #[test]
    fn test_other_conversations_are_isolated(specs in message_specs()) {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
            seed(&store, alice, bob, &specs).await;

            let unrelated = store.conversation(alice, carol, true).await.unwrap();
            assert!(unrelated.is_empty());
        });
    }
}

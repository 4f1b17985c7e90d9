//! Property-based tests for the bounded message store.
//!
//! Properties:
//! 1. Length never exceeds capacity; the evicted record is the oldest one
//! 2. A snapshot never changes after capture
//! 3. History batches keep the newest records within capacity
//! 4. A concurrent producer never exposes a torn or oversized version

use chatview::model::MessageRecord;
use chatview::store::MessageStore;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

fn texts(store: &MessageStore) -> Vec<String> {
    store.snapshot().iter().map(|r| r.copy_text()).collect()
}

// ===== Property 1: Bounded Append =====

proptest! {
    #[test]
    fn push_back_stays_within_capacity(capacity in 1usize..8, count in 0usize..40) {
        let store = MessageStore::new(capacity);
        let mut model: VecDeque<String> = VecDeque::new();

        for i in 0..count {
            let text = format!("m{i}");
            let evicted = store.push_back(MessageRecord::plain(&text));

            if model.len() == capacity {
                let oldest = model.pop_front();
                prop_assert_eq!(evicted.map(|r| r.copy_text()), oldest);
            } else {
                prop_assert!(evicted.is_none());
            }
            model.push_back(text);

            prop_assert!(store.len() <= capacity);
        }

        prop_assert_eq!(texts(&store), Vec::from(model));
    }
}

#[test]
fn capacity_three_keeps_the_last_three() {
    let store = MessageStore::new(3);
    let mut evictions = Vec::new();

    for name in ["A", "B", "C", "D"] {
        if let Some(evicted) = store.push_back(MessageRecord::plain(name)) {
            evictions.push(evicted.copy_text());
        }
    }

    assert_eq!(evictions, vec!["A".to_string()]);
    assert_eq!(texts(&store), vec!["B", "C", "D"]);
    assert_eq!(store.len(), 3);
}

#[test]
fn zero_capacity_store_drops_everything() {
    let store = MessageStore::new(0);

    assert!(store.push_back(MessageRecord::plain("a")).is_none());
    assert_eq!(store.push_front(vec![MessageRecord::plain("b")]), 0);
    assert!(store.is_empty());
}

// ===== Property 2: Snapshot Isolation =====

proptest! {
    #[test]
    fn snapshot_is_frozen_at_capture(
        capacity in 1usize..10,
        before in 0usize..12,
        after in 0usize..12,
        history in 0usize..6,
    ) {
        let store = MessageStore::new(capacity);
        for i in 0..before {
            store.push_back(MessageRecord::plain(&format!("b{i}")));
        }
        let snapshot = store.snapshot();
        let captured: Vec<String> = snapshot.iter().map(|r| r.copy_text()).collect();

        for i in 0..after {
            store.push_back(MessageRecord::plain(&format!("a{i}")));
        }
        store.push_front((0..history).map(|i| MessageRecord::plain(&format!("h{i}"))).collect());
        store.clear();

        let now: Vec<String> = snapshot.iter().map(|r| r.copy_text()).collect();
        prop_assert_eq!(snapshot.len(), captured.len());
        prop_assert_eq!(now, captured);
    }
}

// ===== Property 3: History Batches =====

proptest! {
    #[test]
    fn push_front_keeps_newest_within_capacity(
        capacity in 1usize..8,
        existing in 0usize..8,
        batch in 1usize..12,
    ) {
        let store = MessageStore::new(capacity);
        for i in 0..existing {
            store.push_back(MessageRecord::plain(&format!("e{i}")));
        }
        let held = store.len();

        let evicted = store.push_front(
            (0..batch).map(|i| MessageRecord::plain(&format!("h{i}"))).collect(),
        );

        let rows = texts(&store);
        let kept_from_batch = batch.min(capacity);
        prop_assert_eq!(rows.len(), (held + kept_from_batch).min(capacity));
        prop_assert_eq!(evicted, (held + kept_from_batch).saturating_sub(capacity));

        // Oldest-first order: the batch's newest records lead the store.
        let first_kept = batch - kept_from_batch;
        for (offset, text) in rows.iter().take(kept_from_batch).enumerate() {
            prop_assert_eq!(text, &format!("h{}", first_kept + offset));
        }
    }
}

// ===== Property 4: Concurrent Producer =====

#[test]
fn concurrent_appends_never_expose_partial_versions() {
    let capacity = 16;
    let total = 2_000;
    let store = Arc::new(MessageStore::new(capacity));

    let producer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..total {
                store.push_back(MessageRecord::plain(&format!("m{i}")));
            }
        })
    };

    let mut observed = 0;
    while observed < 200 || !producer.is_finished() {
        let snapshot = store.snapshot();
        assert!(snapshot.len() <= capacity);
        // Rows are contiguous: consecutive ids, oldest first.
        let ids: Vec<u64> = snapshot.iter().map(|r| r.id().get()).collect();
        assert!(ids.windows(2).all(|pair| pair[1] == pair[0] + 1));
        observed += 1;
    }

    producer.join().expect("producer thread");
    let rows = texts(&store);
    assert_eq!(rows.len(), capacity);
    assert_eq!(rows.last().map(String::as_str), Some("m1999"));
}

//! Bounded message store with snapshot isolation.
//!
//! One producer mutates at a time (serialized by the writer mutex). Every
//! mutation builds a complete new version of the row sequence and publishes
//! it by swapping a single `Arc` under a short write lock, so snapshot
//! capture only ever waits for that pointer swap, never for a mutation to
//! finish building.
//!
//! The crate-internal mutators take a `published` callback that runs with
//! the new version while the writer mutex is still held. `ChannelHandle`
//! sends its events from there, so events leave in mutation order and each
//! carries exactly the version it describes.

pub mod channel;

pub use channel::{ChannelHandle, StoreChange, StoreEvent};

use crate::model::{MessageId, MessageRecord};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

type Rows = VecDeque<Arc<MessageRecord>>;

/// Immutable view of the store at one instant.
///
/// Cloning is O(1). Mutations made after capture never show through.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    rows: Arc<Rows>,
}

impl Snapshot {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the snapshot holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&Arc<MessageRecord>> {
        self.rows.get(index)
    }

    /// Newest row.
    pub fn last(&self) -> Option<&Arc<MessageRecord>> {
        self.rows.back()
    }

    /// Rows oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<MessageRecord>> + ExactSizeIterator {
        self.rows.iter()
    }

    /// Index of the row carrying `id`.
    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.rows.iter().position(|record| record.id() == id)
    }

    /// Whether two snapshots share the same version.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

impl std::ops::Index<usize> for Snapshot {
    type Output = Arc<MessageRecord>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

/// Result of an append.
#[derive(Debug, Clone)]
pub(crate) struct Appended {
    pub(crate) record: Arc<MessageRecord>,
    pub(crate) evicted: Option<Arc<MessageRecord>>,
    pub(crate) snapshot: Snapshot,
}

/// Result of a history prepend.
#[derive(Debug, Clone)]
pub(crate) struct Prepended {
    pub(crate) records: Vec<Arc<MessageRecord>>,
    pub(crate) evicted_from_tail: usize,
    pub(crate) snapshot: Snapshot,
}

/// Result of a replacement.
#[derive(Debug, Clone)]
pub(crate) struct Replaced {
    pub(crate) index: usize,
    pub(crate) record: Arc<MessageRecord>,
    pub(crate) snapshot: Snapshot,
}

/// Ordered, bounded sequence of message records.
#[derive(Debug)]
pub struct MessageStore {
    capacity: usize,
    /// Serializes producers; holds the next id to assign.
    writer: Mutex<MessageId>,
    current: RwLock<Arc<Rows>>,
}

impl MessageStore {
    /// Create an empty store holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            writer: Mutex::new(MessageId::FIRST),
            current: RwLock::new(Arc::new(VecDeque::with_capacity(capacity.min(4096)))),
        }
    }

    /// Maximum number of records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records in the current version.
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Whether the current version is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capture the current version.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.current.read().clone(),
        }
    }

    /// Capture the current version with no mutation in flight.
    ///
    /// `f` runs while producers are held off, so any event a producer sent
    /// before the call describes a version at or before the one passed in.
    pub(crate) fn settled<R>(&self, f: impl FnOnce(Snapshot) -> R) -> R {
        let _writer = self.writer.lock();
        f(self.snapshot())
    }

    /// Append at the tail, evicting the head once full.
    ///
    /// Returns the evicted record. With zero capacity the record is dropped
    /// and `None` is returned.
    pub fn push_back(&self, record: MessageRecord) -> Option<Arc<MessageRecord>> {
        self.append(record, |_| {})
            .and_then(|appended| appended.evicted)
    }

    /// Prepend a batch of older records (oldest first).
    ///
    /// Evicts from the tail to stay within capacity and returns how many
    /// records were evicted. If the batch alone exceeds capacity only its
    /// newest `capacity` records are kept.
    pub fn push_front(&self, records: Vec<MessageRecord>) -> usize {
        self.prepend(records, |_| {}).evicted_from_tail
    }

    /// Replace the record identified by `old` with `record`.
    ///
    /// The replacement gets a fresh id. Returns the row index, or `None`
    /// when `old` is no longer in the store.
    pub fn replace(&self, old: MessageId, record: MessageRecord) -> Option<usize> {
        self.replace_record(old, record, |_| {})
            .map(|replaced| replaced.index)
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.clear_then(|_| {});
    }

    pub(crate) fn clear_then(&self, published: impl FnOnce(&Snapshot)) {
        let _writer = self.writer.lock();
        let snapshot = self.publish(VecDeque::new());
        debug!("message store cleared");
        published(&snapshot);
    }

    pub(crate) fn append(
        &self,
        record: MessageRecord,
        published: impl FnOnce(&Appended),
    ) -> Option<Appended> {
        if self.capacity == 0 {
            trace!("append ignored: zero capacity");
            return None;
        }

        let mut next_id = self.writer.lock();
        let mut rows: Rows = (**self.current.read()).clone();

        let record = Arc::new(record.with_id(*next_id));
        *next_id = next_id.next();

        let evicted = if rows.len() >= self.capacity {
            rows.pop_front()
        } else {
            None
        };
        rows.push_back(Arc::clone(&record));

        let snapshot = self.publish(rows);
        trace!(id = %record.id(), evicted = evicted.is_some(), "appended");
        let appended = Appended {
            record,
            evicted,
            snapshot,
        };
        published(&appended);
        Some(appended)
    }

    pub(crate) fn prepend(
        &self,
        records: Vec<MessageRecord>,
        published: impl FnOnce(&Prepended),
    ) -> Prepended {
        if self.capacity == 0 || records.is_empty() {
            return Prepended {
                records: Vec::new(),
                evicted_from_tail: 0,
                snapshot: self.snapshot(),
            };
        }

        let mut next_id = self.writer.lock();
        let mut rows: Rows = (**self.current.read()).clone();

        let skip = records.len().saturating_sub(self.capacity);
        let batch: Vec<Arc<MessageRecord>> = records
            .into_iter()
            .skip(skip)
            .map(|record| {
                let record = Arc::new(record.with_id(*next_id));
                *next_id = next_id.next();
                record
            })
            .collect();

        let overflow = (rows.len() + batch.len()).saturating_sub(self.capacity);
        rows.truncate(rows.len() - overflow);
        for record in batch.iter().rev() {
            rows.push_front(Arc::clone(record));
        }

        let snapshot = self.publish(rows);
        debug!(
            inserted = batch.len(),
            dropped_from_batch = skip,
            evicted_from_tail = overflow,
            "prepended history"
        );
        let prepended = Prepended {
            records: batch,
            evicted_from_tail: overflow,
            snapshot,
        };
        published(&prepended);
        prepended
    }

    pub(crate) fn replace_record(
        &self,
        old: MessageId,
        record: MessageRecord,
        published: impl FnOnce(&Replaced),
    ) -> Option<Replaced> {
        let mut next_id = self.writer.lock();
        let current = self.current.read().clone();

        let Some(index) = current.iter().position(|r| r.id() == old) else {
            debug!(id = %old, "replace ignored: record not found");
            return None;
        };

        let mut rows: Rows = (*current).clone();
        let record = Arc::new(record.with_id(*next_id));
        *next_id = next_id.next();
        rows[index] = Arc::clone(&record);

        let snapshot = self.publish(rows);
        trace!(index, old = %old, new = %record.id(), "replaced");
        let replaced = Replaced {
            index,
            record,
            snapshot,
        };
        published(&replaced);
        Some(replaced)
    }

    fn publish(&self, rows: Rows) -> Snapshot {
        let rows = Arc::new(rows);
        *self.current.write() = Arc::clone(&rows);
        Snapshot { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> MessageRecord {
        MessageRecord::plain(s)
    }

    fn texts(snapshot: &Snapshot) -> Vec<String> {
        snapshot.iter().map(|r| r.copy_text()).collect()
    }

    #[test]
    fn capacity_three_evicts_oldest() {
        let store = MessageStore::new(3);
        assert!(store.push_back(text("A")).is_none());
        assert!(store.push_back(text("B")).is_none());
        assert!(store.push_back(text("C")).is_none());

        let evicted = store.push_back(text("D")).map(|r| r.copy_text());
        assert_eq!(evicted.as_deref(), Some("A"));
        assert_eq!(texts(&store.snapshot()), vec!["B", "C", "D"]);
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let store = MessageStore::new(3);
        store.push_back(text("A"));
        store.push_back(text("B"));
        let before = store.snapshot();

        store.push_back(text("C"));
        store.push_back(text("D"));
        store.clear();

        assert_eq!(texts(&before), vec!["A", "B"]);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn zero_capacity_ignores_pushes() {
        let store = MessageStore::new(0);
        assert!(store.push_back(text("A")).is_none());
        assert_eq!(store.push_front(vec![text("B")]), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_assigned_and_increasing() {
        let store = MessageStore::new(10);
        store.push_back(text("A"));
        store.push_back(text("B"));
        let snap = store.snapshot();
        assert!(snap[0].id().is_assigned());
        assert!(snap[0].id() < snap[1].id());
    }

    #[test]
    fn push_front_evicts_from_tail() {
        let store = MessageStore::new(4);
        store.push_back(text("C"));
        store.push_back(text("D"));
        store.push_back(text("E"));

        let evicted = store.push_front(vec![text("A"), text("B")]);
        assert_eq!(evicted, 1);
        assert_eq!(texts(&store.snapshot()), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn push_front_oversized_batch_keeps_newest() {
        let store = MessageStore::new(2);
        store.push_back(text("Z"));

        let evicted = store.push_front(vec![text("A"), text("B"), text("C")]);
        assert_eq!(evicted, 1);
        assert_eq!(texts(&store.snapshot()), vec!["B", "C"]);
    }

    #[test]
    fn replace_returns_index_and_assigns_new_id() {
        let store = MessageStore::new(3);
        store.push_back(text("A"));
        store.push_back(text("B"));
        let old = store.snapshot()[1].id();

        assert_eq!(store.replace(old, text("B2")), Some(1));
        let snap = store.snapshot();
        assert_eq!(snap[1].copy_text(), "B2");
        assert_ne!(snap[1].id(), old);
    }

    #[test]
    fn replace_of_evicted_record_is_not_found() {
        let store = MessageStore::new(1);
        store.push_back(text("A"));
        let stale = store.snapshot()[0].id();
        store.push_back(text("B"));

        assert_eq!(store.replace(stale, text("A2")), None);
        assert_eq!(texts(&store.snapshot()), vec!["B"]);
    }

    #[test]
    fn position_finds_rows_by_id() {
        let store = MessageStore::new(3);
        store.push_back(text("A"));
        store.push_back(text("B"));
        let snap = store.snapshot();
        assert_eq!(snap.position(snap[1].id()), Some(1));
        assert_eq!(snap.position(MessageId::new(999)), None);
    }

    #[test]
    fn concurrent_snapshots_never_exceed_capacity() {
        let store = Arc::new(MessageStore::new(16));
        let producer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..2_000 {
                    store.push_back(text(&i.to_string()));
                }
            })
        };

        for _ in 0..2_000 {
            let snap = store.snapshot();
            assert!(snap.len() <= 16);
            let ids: Vec<_> = snap.iter().map(|r| r.id()).collect();
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
        producer.join().unwrap();
        assert_eq!(store.len(), 16);
    }
}

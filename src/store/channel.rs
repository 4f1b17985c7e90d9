//! Producer side of the store: mutation plus change notification.

use super::{MessageStore, Snapshot};
use crate::model::{MessageId, MessageRecord, ScrollbarHighlight};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, trace};

/// Change notification emitted after a store mutation has been published.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A record was added at the tail.
    Appended {
        /// Id of the new record.
        id: MessageId,
        /// Scrollbar marker of the new record.
        highlight: ScrollbarHighlight,
        /// Whether the record may raise a notification.
        notify: bool,
    },
    /// A batch of older records was added at the head.
    AddedAtStart {
        /// Number of rows inserted.
        count: usize,
        /// Markers of the inserted rows, oldest first.
        highlights: Vec<ScrollbarHighlight>,
        /// Rows evicted from the tail to make room.
        evicted_from_tail: usize,
    },
    /// The head record was evicted. Always precedes the `Appended` that
    /// caused it.
    RemovedFromStart {
        /// Id of the evicted record.
        id: MessageId,
    },
    /// A record was replaced in place.
    Replaced {
        /// Row index of the replacement.
        index: usize,
        /// Id of the replacement record.
        id: MessageId,
        /// Marker of the replacement record.
        highlight: ScrollbarHighlight,
    },
    /// Every record was removed.
    Cleared,
}

/// A [`StoreEvent`] together with the store version it produced.
///
/// Every event of one mutation carries the same snapshot. A view that
/// adopts the snapshot of the last change it drained sees exactly the rows
/// those events describe, even while a producer keeps mutating.
#[derive(Debug, Clone)]
pub struct StoreChange {
    /// What happened.
    pub event: StoreEvent,
    /// Store contents right after the mutation.
    pub snapshot: Snapshot,
}

/// Handle held by a producer thread.
///
/// Performs the mutation on the shared store and emits the matching
/// [`StoreChange`]s in order before the store accepts the next mutation.
/// A dropped receiver is logged and otherwise ignored; the store keeps
/// accepting mutations.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    store: Arc<MessageStore>,
    events: Sender<StoreChange>,
}

impl ChannelHandle {
    /// Create a handle and the receiver a view drains.
    pub fn new(store: Arc<MessageStore>) -> (Self, Receiver<StoreChange>) {
        let (events, receiver) = mpsc::channel();
        (Self { store, events }, receiver)
    }

    /// The shared store.
    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Append one record at the tail.
    pub fn add_message(&self, record: MessageRecord) -> Option<MessageId> {
        let appended = self.store.append(record, |appended| {
            if let Some(evicted) = &appended.evicted {
                self.emit(
                    StoreEvent::RemovedFromStart { id: evicted.id() },
                    &appended.snapshot,
                );
            }
            let record = &appended.record;
            self.emit(
                StoreEvent::Appended {
                    id: record.id(),
                    highlight: record.scrollbar_highlight(),
                    notify: !record.flags().do_not_notify,
                },
                &appended.snapshot,
            );
        })?;
        Some(appended.record.id())
    }

    /// Prepend a batch of history (oldest first).
    pub fn add_messages_at_start(&self, records: Vec<MessageRecord>) {
        self.store.prepend(records, |prepended| {
            self.emit(
                StoreEvent::AddedAtStart {
                    count: prepended.records.len(),
                    highlights: prepended
                        .records
                        .iter()
                        .map(|r| r.scrollbar_highlight())
                        .collect(),
                    evicted_from_tail: prepended.evicted_from_tail,
                },
                &prepended.snapshot,
            );
        });
    }

    /// Replace a record. Returns the row index, or `None` if it was evicted.
    pub fn replace_message(&self, old: MessageId, record: MessageRecord) -> Option<usize> {
        let replaced = self.store.replace_record(old, record, |replaced| {
            self.emit(
                StoreEvent::Replaced {
                    index: replaced.index,
                    id: replaced.record.id(),
                    highlight: replaced.record.scrollbar_highlight(),
                },
                &replaced.snapshot,
            );
        })?;
        Some(replaced.index)
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.store
            .clear_then(|snapshot| self.emit(StoreEvent::Cleared, snapshot));
    }

    fn emit(&self, event: StoreEvent, snapshot: &Snapshot) {
        let change = StoreChange {
            event,
            snapshot: snapshot.clone(),
        };
        if let Err(mpsc::SendError(change)) = self.events.send(change) {
            debug!(event = ?change.event, "store event dropped: view receiver closed");
        }
    }
}

/// Drain every pending change without blocking.
pub fn drain(receiver: &Receiver<StoreChange>) -> Vec<StoreChange> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(mpsc::TryRecvError::Empty) => break,
            Err(mpsc::TryRecvError::Disconnected) => {
                // Producers finished; the store itself stays readable.
                trace!(pending = events.len(), "store event channel disconnected");
                break;
            }
        }
    }
    events
}

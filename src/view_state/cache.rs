//! Paint buffers for on-screen messages.
//!
//! Painting a message is comparatively expensive, so each message's painted
//! form is kept while the message stays on screen and reused as long as its
//! layout generation is unchanged. Buffers of messages that scroll off
//! screen are released at the start of the next paint pass, which keeps
//! buffer memory proportional to the number of visible rows.

use crate::model::MessageId;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::trace;

#[derive(Debug, Clone)]
struct CachedBuffer<B> {
    generation: u64,
    buffer: B,
}

/// Buffers keyed by message identity, bounded by the on-screen set.
#[derive(Debug, Clone)]
pub struct PaintBufferCache<B> {
    buffers: HashMap<MessageId, CachedBuffer<B>>,
    on_screen: HashSet<MessageId>,
    builds: u64,
}

impl<B> Default for PaintBufferCache<B> {
    fn default() -> Self {
        Self {
            buffers: HashMap::new(),
            on_screen: HashSet::new(),
            builds: 0,
        }
    }
}

impl<B> PaintBufferCache<B> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a paint pass with the given on-screen set.
    ///
    /// Buffers of messages outside the new set are released. Returns how
    /// many were released.
    pub fn begin_pass(&mut self, on_screen: impl IntoIterator<Item = MessageId>) -> usize {
        self.on_screen = on_screen.into_iter().collect();
        let before = self.buffers.len();
        let on_screen = &self.on_screen;
        self.buffers.retain(|id, _| on_screen.contains(id));
        let released = before - self.buffers.len();
        if released > 0 {
            trace!(released, kept = self.buffers.len(), "released paint buffers");
        }
        released
    }

    /// Buffer for `id`, rebuilt when missing or stale.
    pub fn get_or_build(&mut self, id: MessageId, generation: u64, build: impl FnOnce() -> B) -> &B {
        match self.buffers.entry(id) {
            Entry::Occupied(entry) => {
                let cached = entry.into_mut();
                if cached.generation != generation {
                    cached.buffer = build();
                    cached.generation = generation;
                    self.builds += 1;
                }
                &cached.buffer
            }
            Entry::Vacant(entry) => {
                self.builds += 1;
                &entry.insert(CachedBuffer { generation, buffer: build() }).buffer
            }
        }
    }

    /// Buffer for `id` if one is cached, whatever its generation.
    pub fn get(&self, id: MessageId) -> Option<&B> {
        self.buffers.get(&id).map(|cached| &cached.buffer)
    }

    /// Drop the buffer for `id`. Returns whether one existed.
    pub fn invalidate(&mut self, id: MessageId) -> bool {
        self.buffers.remove(&id).is_some()
    }

    /// Whether a buffer for `id` is held.
    pub fn contains(&self, id: MessageId) -> bool {
        self.buffers.contains_key(&id)
    }

    /// Number of buffers held.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether no buffers are held.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Identities of the last pass's on-screen set.
    pub fn on_screen(&self) -> &HashSet<MessageId> {
        &self.on_screen
    }

    /// Total number of buffer builds since creation.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Drop every buffer.
    pub fn clear(&mut self) {
        self.buffers.clear();
        self.on_screen.clear();
    }
}

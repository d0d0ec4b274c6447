//! Batch queues.

use std::collections::HashMap;
use std::fmt;

/// The four remote operations a queued item can be submitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Create,
    Update,
    Upsert,
    Delete,
}

impl BatchKind {
    /// Fixed order in which `flush` drains the queues.
    pub const FLUSH_ORDER: [BatchKind; 4] = [
        BatchKind::Delete,
        BatchKind::Create,
        BatchKind::Update,
        BatchKind::Upsert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchKind::Create => "create",
            BatchKind::Update => "update",
            BatchKind::Upsert => "upsert",
            BatchKind::Delete => "delete",
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered pending items for one (kind, object type) pair.
///
/// The queue does not own its limit: the saver's limits can change at any
/// time and only apply at the next capacity check.
#[derive(Debug, Clone)]
pub struct TypedQueue<T> {
    items: Vec<T>,
}

impl<T> TypedQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// True when one more item would take the queue past `limit`.
    pub fn is_at_capacity(&self, limit: usize) -> bool {
        !self.items.is_empty() && self.items.len() >= limit
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for TypedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-object-type queues for one kind, iterated in first-seen order.
#[derive(Debug, Clone)]
pub struct QueueFamily<T> {
    queues: Vec<(String, TypedQueue<T>)>,
    index: HashMap<String, usize>,
}

impl<T> QueueFamily<T> {
    pub fn new() -> Self {
        Self {
            queues: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Slot of the queue for `object_type`, creating an empty one at the end if needed.
    pub fn slot(&mut self, object_type: &str) -> usize {
        if let Some(&slot) = self.index.get(object_type) {
            return slot;
        }
        let slot = self.queues.len();
        self.queues.push((object_type.to_string(), TypedQueue::new()));
        self.index.insert(object_type.to_string(), slot);
        slot
    }

    pub fn get(&self, object_type: &str) -> Option<&TypedQueue<T>> {
        self.index.get(object_type).map(|&slot| &self.queues[slot].1)
    }

    /// Object type and queue at `slot`. Panics if `slot` is out of range.
    pub fn at(&self, slot: usize) -> (&str, &TypedQueue<T>) {
        let (object_type, queue) = &self.queues[slot];
        (object_type, queue)
    }

    pub fn at_mut(&mut self, slot: usize) -> &mut TypedQueue<T> {
        &mut self.queues[slot].1
    }

    /// Number of object types seen since the last `clear`.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Total number of pending items across every object type.
    pub fn pending(&self) -> usize {
        self.queues.iter().map(|(_, q)| q.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedQueue<T>)> {
        self.queues.iter().map(|(t, q)| (t.as_str(), q))
    }

    /// Drops every queue, including the remembered type order.
    pub fn clear(&mut self) {
        self.queues.clear();
        self.index.clear();
    }
}

impl<T> Default for QueueFamily<T> {
    fn default() -> Self {
        Self::new()
    }
}

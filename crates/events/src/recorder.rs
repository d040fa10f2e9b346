//! Per-aggregate buffer of raised events.
//!
//! Aggregates hold an `EventRecorder` by value instead of inheriting event machinery:
//! every successful mutation records exactly one event, and the owner drains the
//! buffer once the use-case is done.

/// Append-only, owned sequence of pending events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecorder<E> {
    pending: Vec<E>,
    recorded: u64,
}

impl<E> EventRecorder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Order of recording is preserved.
    pub fn record(&mut self, event: E) {
        self.pending.push(event);
        self.recorded += 1;
    }

    pub fn pending(&self) -> &[E] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total number of events ever recorded, drained or not.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Remove and return every pending event, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }
}

impl<E> Default for EventRecorder<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            recorded: 0,
        }
    }
}

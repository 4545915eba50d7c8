//! Pending event queue owned by each aggregate instance.

/// Append-only FIFO of events produced by successful commands.
///
/// Reading is idempotent; only `drain` removes events, and only the caller
/// dispatching a command invokes it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQueue<E> {
    pending: Vec<E>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: E) {
        self.pending.push(event);
    }

    /// Snapshot of the pending events in emission order.
    pub fn events(&self) -> &[E] {
        &self.pending
    }

    /// Take every pending event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

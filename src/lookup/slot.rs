use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a lookup was started; see [`RequestSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks the latest request of one lookup kind. Starting a request
/// invalidates every earlier ticket, so a slow, older response can never
/// overwrite the result of a newer one.
#[derive(Debug, Default)]
pub struct RequestSlot {
    generation: AtomicU64,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `value` through only if `ticket` has not been superseded.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

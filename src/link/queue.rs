//! Bounded FIFO queues shared between execution contexts.
//!
//! Uses `embassy-sync` bounded channels so producers in the transport
//! delivery context (BT task / ISR) and the polling consumer loop can share
//! a queue without caller-provided locking. All operations are
//! non-blocking; on overflow the NEW item is dropped and handed back to the
//! caller — producers run in contexts that must never block on
//! back-pressure.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

/// Queue depth used for both the inbound and outbound line queues.
pub const LINE_QUEUE_DEPTH: usize = 100;

/// Fixed-capacity FIFO, safe across preemptive execution contexts.
pub struct BoundedQueue<T, const N: usize> {
    ch: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> BoundedQueue<T, N> {
    pub const fn new() -> Self {
        Self { ch: Channel::new() }
    }

    /// Push an item. On a full queue the item is rejected and returned —
    /// drop-newest overflow, the caller decides whether to log.
    pub fn push(&self, item: T) -> Result<(), T> {
        match self.ch.try_send(item) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(rejected)) => Err(rejected),
        }
    }

    /// Pop the oldest item, or `None` when empty.
    pub fn pop(&self) -> Option<T> {
        self.ch.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.ch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ch.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ch.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop all queued items.
    pub fn clear(&self) {
        self.ch.clear();
    }
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────

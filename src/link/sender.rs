//! Credit-gated outbound sender.
//!
//! The transport hands out a single one-shot send permission at a time;
//! it never offers one unprompted. The sender therefore runs a small state
//! machine:
//!
//! ```text
//!            heartbeat, queue non-empty
//!   ┌──────┐ ──────────────────────────▶ ┌───────────────┐
//!   │ Idle │                             │ CreditPending │
//!   └──────┘ ◀────────────────────────── └───────────────┘
//!      ▲        grant, queue empty               │ grant
//!      │                                         ▼
//!      │        line fully chunked out    ┌─────────┐
//!      └───────────────────────────────── │ Sending │
//!                                         └─────────┘
//! ```
//!
//! Exactly one queued line is drained per grant, split into consecutive
//! `≤ MTU` chunks. The state lives in atomics so producers (dispatcher),
//! the heartbeat and the transport context can all share `&self` — the
//! same cross-context discipline as a lock-free event queue.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use log::{debug, warn};

use super::line::Line;
use super::queue::BoundedQueue;
use super::transport::LinkTransport;

/// Sender state machine positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SenderState {
    /// No permission requested, none granted.
    Idle = 0,
    /// One permission request is outstanding.
    CreditPending = 1,
    /// A grant is being consumed: one line is going out in chunks.
    Sending = 2,
}

/// Outbound line queue plus credit bookkeeping.
pub struct CreditedSender<const N: usize> {
    outbound: BoundedQueue<Line, N>,
    state: AtomicU8,
    /// Negotiated MTU; 0 until a session opens, so no sends are possible.
    mtu: AtomicUsize,
}

impl<const N: usize> CreditedSender<N> {
    pub const fn new() -> Self {
        Self {
            outbound: BoundedQueue::new(),
            state: AtomicU8::new(SenderState::Idle as u8),
            mtu: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> SenderState {
        match self.state.load(Ordering::Acquire) {
            1 => SenderState::CreditPending,
            2 => SenderState::Sending,
            _ => SenderState::Idle,
        }
    }

    pub fn mtu(&self) -> usize {
        self.mtu.load(Ordering::Acquire)
    }

    /// Number of queued, not-yet-transmitted lines.
    pub fn pending_lines(&self) -> usize {
        self.outbound.len()
    }

    /// Queue a line for transmission.
    ///
    /// Non-blocking; callable from any producer context. Returns `false`
    /// when the queue is full and the line was dropped.
    pub fn enqueue(&self, line: Line) -> bool {
        match self.outbound.push(line) {
            Ok(()) => true,
            Err(dropped) => {
                warn!(
                    "sender: outbound queue full, dropping {}-byte line",
                    dropped.len()
                );
                false
            }
        }
    }

    /// Session opened: latch the negotiated MTU.
    pub fn on_connect(&self, mtu: usize) {
        self.mtu.store(mtu, Ordering::Release);
        self.state
            .store(SenderState::Idle as u8, Ordering::Release);
        debug!("sender: session open, MTU={}", mtu);
    }

    /// Session closed: void any credit and drop queued responses.
    ///
    /// Responses answer the requests of the session that just died; a
    /// reconnecting client re-syncs with a fresh `get config`.
    pub fn on_disconnect(&self) {
        self.mtu.store(0, Ordering::Release);
        self.state
            .store(SenderState::Idle as u8, Ordering::Release);
        let dropped = self.outbound.len();
        self.outbound.clear();
        if dropped > 0 {
            debug!("sender: session closed, {} queued lines dropped", dropped);
        }
    }

    /// Periodic re-arm tick.
    ///
    /// The transport only grants permission when asked, and the sender only
    /// asks here: if there is something to send, the MTU is known, and no
    /// request is already outstanding, request one.
    pub fn on_heartbeat_tick(&self, transport: &mut impl LinkTransport) {
        if self.mtu.load(Ordering::Acquire) == 0 || self.outbound.is_empty() {
            return;
        }
        // Only Idle may arm a request — a compare-exchange so two racing
        // ticks cannot both ask.
        if self
            .state
            .compare_exchange(
                SenderState::Idle as u8,
                SenderState::CreditPending as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            transport.request_send_permission();
        }
    }

    /// The one-shot permission arrived: drain exactly one line.
    ///
    /// If the queue is empty the grant goes unused; the next heartbeat with
    /// queued data will request a new one. A mid-line send failure aborts
    /// the remaining chunks of that line without requeueing it.
    pub fn on_ready_to_send(&self, transport: &mut impl LinkTransport) {
        let mtu = self.mtu.load(Ordering::Acquire);
        if mtu == 0 {
            self.state
                .store(SenderState::Idle as u8, Ordering::Release);
            return;
        }

        let Some(line) = self.outbound.pop() else {
            self.state
                .store(SenderState::Idle as u8, Ordering::Release);
            return;
        };

        self.state
            .store(SenderState::Sending as u8, Ordering::Release);
        for chunk in line.as_bytes().chunks(mtu) {
            if let Err(e) = transport.send(chunk) {
                warn!("sender: send failed mid-line ({}), dropping remainder", e);
                break;
            }
        }
        self.state
            .store(SenderState::Idle as u8, Ordering::Release);
    }
}

impl<const N: usize> Default for CreditedSender<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────

//! The transport collaborator seam.
//!
//! The Bluetooth stack (or a test double) sits behind [`LinkTransport`]
//! and delivers its callbacks as [`TransportEvent`] values, dispatched by
//! `match` in [`LinkSession`](super::session::LinkSession). The closed
//! event set replaces tag-keyed packet-handler dispatch: adding an event
//! kind is a compile-checked change, not a new `case` in a grab-bag
//! handler.

use core::fmt;

// ── Error type ───────────────────────────────────────────────

/// Errors from a transport send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No session is open.
    NotConnected,
    /// The transport refused the chunk (stack buffer exhausted, session
    /// tearing down, …).
    Rejected,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "no session open"),
            Self::Rejected => write!(f, "chunk rejected by transport"),
        }
    }
}

// ── Transport trait ──────────────────────────────────────────

/// Write-side transport operations the link layer drives.
pub trait LinkTransport {
    /// Ask for a one-shot send permission. Results in exactly one
    /// [`TransportEvent::ReadyToSend`] later, or none if the session ends
    /// first. Asking again while a request is outstanding is prevented by
    /// the caller ([`CreditedSender`](super::sender::CreditedSender)).
    fn request_send_permission(&mut self);

    /// Transmit one chunk, at most MTU bytes. Ordering is preserved
    /// relative to prior `send` calls for the same line.
    fn send(&mut self, chunk: &[u8]) -> Result<(), SendError>;
}

// ── Transport events ─────────────────────────────────────────

/// Everything the transport can tell us, as a closed set of variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent<'a> {
    /// A session opened; carries the negotiated MTU.
    Connected { mtu: usize },
    /// The session ended. Send credit is void from this point.
    Disconnected,
    /// Raw inbound bytes (any fragmentation).
    Data(&'a [u8]),
    /// The one-shot send permission was granted.
    ReadyToSend,
}

// ── Null transport ───────────────────────────────────────────

/// Placeholder transport: never grants credit, rejects every send.
pub struct NullTransport;

impl LinkTransport for NullTransport {
    fn request_send_permission(&mut self) {}

    fn send(&mut self, _chunk: &[u8]) -> Result<(), SendError> {
        Err(SendError::NotConnected)
    }
}

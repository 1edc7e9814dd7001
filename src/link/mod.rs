//! Line-oriented link layer.
//!
//! Everything between the raw byte-stream transport and the command
//! dispatcher lives here:
//!
//! ```text
//! transport bytes ──▶ LineAssembler ──▶ inbound BoundedQueue ──▶ poll
//!                                                                 │
//! transport sends ◀── CreditedSender ◀── outbound BoundedQueue ◀──┘
//! ```
//!
//! The transport grants a single one-shot send permission at a time; the
//! [`CreditedSender`](sender::CreditedSender) drains exactly one queued
//! line per grant and re-arms itself from a heartbeat tick.

pub mod assembler;
pub mod line;
pub mod queue;
pub mod sender;
pub mod session;
pub mod transport;

pub use assembler::LineAssembler;
pub use line::Line;
pub use queue::{BoundedQueue, LINE_QUEUE_DEPTH};
pub use sender::{CreditedSender, SenderState};
pub use session::LinkSession;
pub use transport::{LinkTransport, NullTransport, SendError, TransportEvent};

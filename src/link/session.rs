//! Link session — wires transport events to the queues.
//!
//! One session at a time. The transport delivery context calls
//! [`LinkSession::on_event`]; the consumer loop calls
//! [`LinkSession::poll_line`] on its poll period and
//! [`LinkSession::on_heartbeat`] on the re-arm period.

use log::{info, warn};

use super::assembler::LineAssembler;
use super::line::Line;
use super::queue::{BoundedQueue, LINE_QUEUE_DEPTH};
use super::sender::CreditedSender;
use super::transport::{LinkTransport, TransportEvent};

/// Protocol engine state for the single active transport session.
pub struct LinkSession {
    assembler: LineAssembler,
    inbound: BoundedQueue<Line, LINE_QUEUE_DEPTH>,
    sender: CreditedSender<LINE_QUEUE_DEPTH>,
}

impl LinkSession {
    pub fn new() -> Self {
        Self {
            assembler: LineAssembler::new(),
            inbound: BoundedQueue::new(),
            sender: CreditedSender::new(),
        }
    }

    /// Dispatch one transport event.
    ///
    /// Runs in the transport delivery context; never blocks. Inbound lines
    /// that do not fit the queue are dropped (the producer cannot wait).
    /// Already-queued command lines survive a reconnect — they are valid
    /// device mutations regardless of which session carried them.
    pub fn on_event(&mut self, event: TransportEvent<'_>, transport: &mut impl LinkTransport) {
        match event {
            TransportEvent::Connected { mtu } => {
                info!("link: session open, MTU={}", mtu);
                self.assembler.reset();
                self.sender.on_connect(mtu);
            }
            TransportEvent::Disconnected => {
                info!("link: session closed");
                self.assembler.reset();
                self.sender.on_disconnect();
            }
            TransportEvent::Data(bytes) => {
                for &byte in bytes {
                    if let Some(line) = self.assembler.feed(byte) {
                        if self.inbound.push(line).is_err() {
                            warn!("link: inbound queue full, dropping command line");
                        }
                    }
                }
            }
            TransportEvent::ReadyToSend => {
                self.sender.on_ready_to_send(transport);
            }
        }
    }

    /// Sender re-arm tick (fixed period, from the timer context).
    pub fn on_heartbeat(&self, transport: &mut impl LinkTransport) {
        self.sender.on_heartbeat_tick(transport);
    }

    /// Pop the next complete command line, if any. Consumer-loop side.
    pub fn poll_line(&self) -> Option<Line> {
        self.inbound.pop()
    }

    /// Queue a response line for credit-gated transmission.
    pub fn send_line(&self, line: Line) -> bool {
        self.sender.enqueue(line)
    }

    pub fn is_connected(&self) -> bool {
        self.sender.mtu() > 0
    }

    pub fn sender(&self) -> &CreditedSender<LINE_QUEUE_DEPTH> {
        &self.sender
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }
}

impl Default for LinkSession {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────

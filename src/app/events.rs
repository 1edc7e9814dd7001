//! Outbound application events.
//!
//! The [`DeviceService`](super::service::DeviceService) and the control
//! loop emit these through the [`EventSink`](super::ports::EventSink)
//! port; the shipped adapter logs them to the serial console.

use super::state::LampChannel;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The master switch changed.
    SwitchChanged(bool),

    /// A colour slider changed.
    SliderChanged { channel: LampChannel, value: u8 },

    /// A client requested the config dump.
    ConfigRequested,

    /// A transport session opened (carries the negotiated MTU).
    SessionOpened { mtu: usize },

    /// The transport session closed.
    SessionClosed,
}

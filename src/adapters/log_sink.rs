//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). A future telemetry
//! characteristic would implement the same trait.

use log::info;

use crate::app::channels::slider_tag;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SwitchChanged(on) => {
                info!("LAMP  | switch {}", if *on { "on" } else { "off" });
            }
            AppEvent::SliderChanged { channel, value } => {
                info!("LAMP  | slider {} = 0x{:02x}", slider_tag(*channel), value);
            }
            AppEvent::ConfigRequested => {
                info!("PROTO | config dump requested");
            }
            AppEvent::SessionOpened { mtu } => {
                info!("LINK  | session open, MTU={}", mtu);
            }
            AppEvent::SessionClosed => {
                info!("LINK  | session closed");
            }
        }
    }
}

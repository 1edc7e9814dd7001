//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeviceService (domain)
//! ```
//!
//! Driven adapters (the PWM hardware, the log/telemetry sink) implement
//! these traits. The [`DeviceService`](super::service::DeviceService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use super::events::AppEvent;
use super::state::LampChannel;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the lamp outputs.
pub trait ActuatorPort {
    /// Set one channel's PWM duty. `percent` is already scaled to the
    /// channel's configured duty span (0.0 = off).
    fn set_duty(&mut self, channel: LampChannel, percent: f32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide where they go (serial log, a status characteristic, …).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

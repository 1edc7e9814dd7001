//! Hardware actuator adapter.
//!
//! Bridges [`ActuatorPort`] to the [`RgbLed`] PWM driver. A failed PWM
//! write is logged and swallowed — a glitched colour update must never
//! take down the protocol engine.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::app::state::LampChannel;
use crate::drivers::rgb_led::RgbLed;
use crate::error::ActuatorError;

/// ActuatorPort over the three LEDC PWM channels.
pub struct HardwareAdapter<P: SetDutyCycle> {
    led: RgbLed<P>,
    last_error: Option<ActuatorError>,
}

impl<P: SetDutyCycle> HardwareAdapter<P> {
    pub fn new(led: RgbLed<P>) -> Self {
        Self {
            led,
            last_error: None,
        }
    }

    /// Most recent actuator failure, for diagnostics.
    pub fn last_error(&self) -> Option<ActuatorError> {
        self.last_error
    }
}

impl<P: SetDutyCycle> ActuatorPort for HardwareAdapter<P> {
    fn set_duty(&mut self, channel: LampChannel, percent: f32) {
        if self.led.set_percent(channel, percent).is_err() {
            warn!("actuator: PWM write failed on {:?}", channel);
            self.last_error = Some(ActuatorError::PwmWriteFailed);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────

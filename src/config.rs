//! Device configuration parameters
//!
//! All tunable parameters for the Lumen lamp. Values are compiled-in
//! defaults; a deployment can override them before constructing the
//! services.

use serde::{Deserialize, Serialize};

/// Maximum device name length (fits a Classic-BT local name).
pub const MAX_DEVICE_NAME_LEN: usize = 32;

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Identity ---
    /// Device name advertised over Bluetooth and reported in the
    /// `device:name:` line of the config dump.
    pub device_name: heapless::String<MAX_DEVICE_NAME_LEN>,

    // --- Timing ---
    /// Sender re-arm heartbeat period (milliseconds)
    pub heartbeat_interval_ms: u32,
    /// Inbound command poll interval (milliseconds)
    pub dispatch_poll_interval_ms: u32,

    // --- Actuator scaling ---
    // Duty span per colour channel: a slider at full scale (0xff) maps to
    // this duty value. 100.0 = a standard 0-100% PWM range. Kept per
    // channel because some LED driver boards expect a 0-1000 dimming range
    // on individual channels.
    /// Red channel duty span
    pub red_duty_span: f32,
    /// Green channel duty span
    pub green_duty_span: f32,
    /// Blue channel duty span
    pub blue_duty_span: f32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_name: heapless::String::try_from("Lumen").unwrap_or_default(),

            // Timing
            heartbeat_interval_ms: 1,       // sender re-arm
            dispatch_poll_interval_ms: 10,  // command consumer

            // Actuator scaling
            red_duty_span: 100.0,
            green_duty_span: 100.0,
            blue_duty_span: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = DeviceConfig::default();
        assert_eq!(c.device_name.as_str(), "Lumen");
        assert!(c.heartbeat_interval_ms > 0);
        assert!(c.dispatch_poll_interval_ms > 0);
        assert!(
            c.heartbeat_interval_ms <= c.dispatch_poll_interval_ms,
            "sender re-arm must be at least as fast as command dispatch"
        );
        assert!(c.red_duty_span > 0.0);
        assert!(c.green_duty_span > 0.0);
        assert!(c.blue_duty_span > 0.0);
    }

    #[test]
    fn duty_spans_match_by_default() {
        // All three channels share the standard 0-100% range unless a
        // deployment overrides one of them.
        let c = DeviceConfig::default();
        assert!((c.red_duty_span - c.green_duty_span).abs() < f32::EPSILON);
        assert!((c.green_duty_span - c.blue_duty_span).abs() < f32::EPSILON);
    }

    #[test]
    fn serde_roundtrip() {
        let c = DeviceConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: DeviceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.device_name, c2.device_name);
        assert_eq!(c.heartbeat_interval_ms, c2.heartbeat_interval_ms);
        assert!((c.blue_duty_span - c2.blue_duty_span).abs() < 0.001);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = DeviceConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: DeviceConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.device_name, c2.device_name);
        assert!((c.red_duty_span - c2.red_duty_span).abs() < 0.001);
    }
}

//! RGB LED driver over three PWM channels.
//!
//! Generic over [`embedded_hal::pwm::SetDutyCycle`], so the same driver
//! runs against ESP32 LEDC channels in production and a mock pin in
//! host tests. Duty is commanded as a percentage of the channel's duty
//! span and mapped onto the pin's native tick range.

use embedded_hal::pwm::SetDutyCycle;

use crate::app::state::LampChannel;

/// Three-channel PWM lamp output.
pub struct RgbLed<P: SetDutyCycle> {
    red: P,
    green: P,
    blue: P,
}

impl<P: SetDutyCycle> RgbLed<P> {
    pub fn new(red: P, green: P, blue: P) -> Self {
        Self { red, green, blue }
    }

    /// Drive one channel at `percent` of full scale.
    ///
    /// Values outside 0-100 are clamped to the pin's range; a channel
    /// with a wider configured duty span saturates at full brightness.
    pub fn set_percent(&mut self, channel: LampChannel, percent: f32) -> Result<(), P::Error> {
        let pin = self.pin_mut(channel);
        let max = f32::from(pin.max_duty_cycle());
        let ticks = (percent.clamp(0.0, 100.0) / 100.0 * max) as u16;
        pin.set_duty_cycle(ticks)
    }

    /// All channels dark.
    pub fn all_off(&mut self) -> Result<(), P::Error> {
        for channel in LampChannel::ALL {
            self.set_percent(channel, 0.0)?;
        }
        Ok(())
    }

    fn pin_mut(&mut self, channel: LampChannel) -> &mut P {
        match channel {
            LampChannel::Red => &mut self.red,
            LampChannel::Green => &mut self.green,
            LampChannel::Blue => &mut self.blue,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct MockPwm {
        max: u16,
        duty: u16,
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    fn led() -> RgbLed<MockPwm> {
        RgbLed::new(
            MockPwm { max: 255, duty: 0 },
            MockPwm { max: 255, duty: 0 },
            MockPwm { max: 255, duty: 0 },
        )
    }

    #[test]
    fn percent_maps_to_ticks() {
        let mut led = led();
        led.set_percent(LampChannel::Red, 100.0).unwrap();
        assert_eq!(led.red.duty, 255);
        led.set_percent(LampChannel::Red, 50.0).unwrap();
        assert_eq!(led.red.duty, 127);
        led.set_percent(LampChannel::Red, 0.0).unwrap();
        assert_eq!(led.red.duty, 0);
    }

    #[test]
    fn out_of_range_percent_clamps() {
        let mut led = led();
        led.set_percent(LampChannel::Blue, 400.0).unwrap();
        assert_eq!(led.blue.duty, 255);
        led.set_percent(LampChannel::Blue, -3.0).unwrap();
        assert_eq!(led.blue.duty, 0);
    }

    #[test]
    fn all_off_darkens_every_channel() {
        let mut led = led();
        for ch in LampChannel::ALL {
            led.set_percent(ch, 80.0).unwrap();
        }
        led.all_off().unwrap();
        assert_eq!(led.red.duty, 0);
        assert_eq!(led.green.duty, 0);
        assert_eq!(led.blue.duty, 0);
    }
}

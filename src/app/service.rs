//! Device service — the dispatch core.
//!
//! One entry point: [`DeviceService::handle_line`] takes a command line
//! popped from the inbound queue, mutates [`DeviceState`], pushes the
//! derived PWM duties through the [`ActuatorPort`], and returns whatever
//! response lines the command produced. All I/O flows through ports
//! injected at the call site, so the whole service runs under test with
//! mock adapters.

use log::debug;

use crate::config::DeviceConfig;

use super::channels::{DeviceDescriptor, ResponseLines, value_lines};
use super::commands::Command;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};
use super::state::{DeviceState, LampChannel};

/// The application service: lamp state plus the frozen descriptor.
pub struct DeviceService {
    state: DeviceState,
    descriptor: DeviceDescriptor,
    /// Duty span per channel, actuator order (see `DeviceConfig`).
    spans: [f32; 3],
}

impl DeviceService {
    /// Construct from configuration. The lamp starts dark: switch off,
    /// all sliders zero.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            state: DeviceState::default(),
            descriptor: DeviceDescriptor::new(config.device_name.as_str()),
            spans: [
                config.red_duty_span,
                config.green_duty_span,
                config.blue_duty_span,
            ],
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Dispatch one inbound line.
    ///
    /// Lines that do not parse as a command are dropped without a
    /// response, a state change, or an actuator call. Every successful
    /// set command recomputes all three duties — the switch gates every
    /// slider, so they stand or fall together.
    pub fn handle_line(
        &mut self,
        line: &crate::link::Line,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> ResponseLines {
        let mut out = ResponseLines::new();

        let Some(command) = Command::parse(line) else {
            debug!("dispatch: ignoring {:?}", line);
            return out;
        };

        match command {
            Command::GetConfig => {
                sink.emit(&AppEvent::ConfigRequested);
                self.descriptor.descriptor_lines(&mut out);
                value_lines(&self.state, &mut out);
            }
            Command::SetSwitch(on) => {
                self.state.switch = on;
                sink.emit(&AppEvent::SwitchChanged(on));
                self.apply_duties(hw);
            }
            Command::SetSlider { channel, value } => {
                self.state.set_slider(channel, value);
                sink.emit(&AppEvent::SliderChanged { channel, value });
                self.apply_duties(hw);
            }
        }

        out
    }

    /// Push the derived duty of every channel to the actuator.
    pub fn apply_duties(&self, hw: &mut impl ActuatorPort) {
        for channel in LampChannel::ALL {
            hw.set_duty(channel, self.duty_percent(channel));
        }
    }

    /// Derived duty for one channel: the slider scaled to its span, or 0
    /// while the master switch is off.
    pub fn duty_percent(&self, channel: LampChannel) -> f32 {
        if !self.state.switch {
            return 0.0;
        }
        f32::from(self.state.slider(channel)) * self.span(channel) / 255.0
    }

    fn span(&self, channel: LampChannel) -> f32 {
        match channel {
            LampChannel::Red => self.spans[0],
            LampChannel::Green => self.spans[1],
            LampChannel::Blue => self.spans[2],
        }
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Line;

    #[derive(Default)]
    struct MockActuator {
        calls: Vec<(LampChannel, f32)>,
    }

    impl ActuatorPort for MockActuator {
        fn set_duty(&mut self, channel: LampChannel, percent: f32) {
            self.calls.push((channel, percent));
        }
    }

    #[derive(Default)]
    struct MockSink {
        events: Vec<AppEvent>,
    }

    impl EventSink for MockSink {
        fn emit(&mut self, event: &AppEvent) {
            self.events.push(*event);
        }
    }

    fn service() -> DeviceService {
        DeviceService::new(&DeviceConfig::default())
    }

    fn dispatch(
        svc: &mut DeviceService,
        hw: &mut MockActuator,
        sink: &mut MockSink,
        text: &str,
    ) -> Vec<String> {
        svc.handle_line(&Line::from(text), hw, sink)
            .iter()
            .map(|l| String::from_utf8_lossy(l.as_bytes()).into_owned())
            .collect()
    }

    #[test]
    fn get_config_on_fresh_state() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let lines = dispatch(&mut svc, &mut hw, &mut sink, "get config");
        assert_eq!(lines.len(), 27);
        assert_eq!(
            &lines[lines.len() - 4..],
            ["C0\n", "D00\n", "E00\n", "F00\n"]
        );
        // A read never touches the actuator.
        assert!(hw.calls.is_empty());
        assert_eq!(sink.events, [AppEvent::ConfigRequested]);
    }

    #[test]
    fn get_config_reflects_current_values() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "D=ff");
        let _ = dispatch(&mut svc, &mut hw, &mut sink, "C=1");
        let lines = dispatch(&mut svc, &mut hw, &mut sink, "get config");
        assert_eq!(
            &lines[lines.len() - 4..],
            ["C1\n", "Dff\n", "E00\n", "F00\n"]
        );
    }

    #[test]
    fn slider_then_switch_reaches_full_duty() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "D=ff");
        let _ = dispatch(&mut svc, &mut hw, &mut sink, "C=1");

        assert_eq!(
            svc.state(),
            DeviceState {
                switch: true,
                red: 0xff,
                green: 0,
                blue: 0
            }
        );

        // Last red-channel call carries the full span.
        let last_red = hw
            .calls
            .iter()
            .rev()
            .find(|(ch, _)| *ch == LampChannel::Red)
            .unwrap();
        assert!((last_red.1 - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sliders_are_dark_while_switch_off() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "D=ff");
        let _ = dispatch(&mut svc, &mut hw, &mut sink, "E=80");

        // Duties recomputed twice, all zero.
        assert_eq!(hw.calls.len(), 6);
        assert!(hw.calls.iter().all(|(_, duty)| *duty == 0.0));
    }

    #[test]
    fn switch_off_zeroes_all_duties() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        for cmd in ["D=ff", "E=ff", "F=ff", "C=1"] {
            let _ = dispatch(&mut svc, &mut hw, &mut sink, cmd);
        }
        hw.calls.clear();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "C=0");
        assert_eq!(hw.calls.len(), 3);
        assert!(hw.calls.iter().all(|(_, duty)| *duty == 0.0));
    }

    #[test]
    fn every_set_recomputes_all_three_channels() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "E=40");
        let channels: Vec<LampChannel> = hw.calls.iter().map(|(ch, _)| *ch).collect();
        assert_eq!(
            channels,
            [LampChannel::Red, LampChannel::Green, LampChannel::Blue]
        );
    }

    #[test]
    fn unknown_line_is_a_no_op() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let before = svc.state();
        let lines = dispatch(&mut svc, &mut hw, &mut sink, "Z=1");
        assert!(lines.is_empty());
        assert_eq!(svc.state(), before);
        assert!(hw.calls.is_empty());
        assert!(sink.events.is_empty());
    }

    #[test]
    fn per_channel_span_scales_duty() {
        let mut config = DeviceConfig::default();
        config.blue_duty_span = 1000.0;
        let mut svc = DeviceService::new(&config);
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "F=ff");
        let _ = dispatch(&mut svc, &mut hw, &mut sink, "C=1");

        let last_blue = hw
            .calls
            .iter()
            .rev()
            .find(|(ch, _)| *ch == LampChannel::Blue)
            .unwrap();
        assert!((last_blue.1 - 1000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn half_scale_duty_math() {
        let mut svc = service();
        let mut hw = MockActuator::default();
        let mut sink = MockSink::default();

        let _ = dispatch(&mut svc, &mut hw, &mut sink, "C=1");
        let _ = dispatch(&mut svc, &mut hw, &mut sink, "D=80");

        let last_red = hw
            .calls
            .iter()
            .rev()
            .find(|(ch, _)| *ch == LampChannel::Red)
            .unwrap();
        // 0x80 / 255 * 100 ≈ 50.2%
        assert!((last_red.1 - 128.0 * 100.0 / 255.0).abs() < 0.001);
    }
}

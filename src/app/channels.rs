//! Channel descriptor tree and the response-line builders.
//!
//! The control surface is four channels: a master switch `C` parenting
//! the three colour sliders `D`/`E`/`F`. The tree is fixed at compile
//! time; only the device name comes from configuration. All wire
//! formatting for responses lives here, so the grammar is testable
//! without any transport.
//!
//! Dump format, one attribute per line:
//!
//! ```text
//! device:name:Lumen
//! C:name:RGB
//! C:type:switch
//! C:mode:sink
//! C:method:push
//! D:name:Slider Red
//! D:type:slider
//! D:mode:sink
//! D:method:push
//! D:color:#000000,#ff0000
//! D:parent:C
//! …
//! C1
//! Dff
//! E00
//! F00
//! ```

use crate::config::MAX_DEVICE_NAME_LEN;
use crate::link::Line;

use super::state::{DeviceState, LampChannel};

/// Upper bound on the lines a single command can produce (the full config
/// dump is 27).
pub const MAX_RESPONSE_LINES: usize = 32;

/// Response batch returned by the dispatcher.
pub type ResponseLines = heapless::Vec<Line, MAX_RESPONSE_LINES>;

// ── Channel table ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Switch,
    Slider,
}

impl ChannelKind {
    const fn wire_name(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Slider => "slider",
        }
    }
}

/// One node of the static channel tree.
pub struct ChannelSpec {
    /// Single-letter wire tag, also the command prefix.
    pub tag: char,
    pub name: &'static str,
    pub kind: ChannelKind,
    /// Colour gradient endpoints as packed `0xRRGGBB`, shown by clients
    /// as the slider track.
    pub gradient: Option<(u32, u32)>,
    /// Parent channel tag; the tree is presentation-only.
    pub parent: Option<char>,
}

/// The lamp's control surface.
pub const CHANNELS: [ChannelSpec; 4] = [
    ChannelSpec {
        tag: 'C',
        name: "RGB",
        kind: ChannelKind::Switch,
        gradient: None,
        parent: None,
    },
    ChannelSpec {
        tag: 'D',
        name: "Slider Red",
        kind: ChannelKind::Slider,
        gradient: Some((0x000000, 0xff0000)),
        parent: Some('C'),
    },
    ChannelSpec {
        tag: 'E',
        name: "Slider Green",
        kind: ChannelKind::Slider,
        gradient: Some((0x000000, 0x00ff00)),
        parent: Some('C'),
    },
    ChannelSpec {
        tag: 'F',
        name: "Slider Blue",
        kind: ChannelKind::Slider,
        gradient: Some((0x000000, 0x0000ff)),
        parent: Some('C'),
    },
];

/// Wire tag of a slider channel.
pub const fn slider_tag(channel: LampChannel) -> char {
    match channel {
        LampChannel::Red => 'D',
        LampChannel::Green => 'E',
        LampChannel::Blue => 'F',
    }
}

// ── Descriptor / builders ────────────────────────────────────

/// The startup-frozen descriptor: static channel tree + configured name.
pub struct DeviceDescriptor {
    name: heapless::String<MAX_DEVICE_NAME_LEN>,
}

impl DeviceDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: heapless::String::try_from(name).unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Append the full descriptor dump to `out`.
    pub fn descriptor_lines(&self, out: &mut ResponseLines) {
        push_line(out, &format!("device:name:{}", self.name));
        for ch in &CHANNELS {
            push_line(out, &format!("{}:name:{}", ch.tag, ch.name));
            push_line(out, &format!("{}:type:{}", ch.tag, ch.kind.wire_name()));
            push_line(out, &format!("{}:mode:sink", ch.tag));
            push_line(out, &format!("{}:method:push", ch.tag));
            if let Some((from, to)) = ch.gradient {
                push_line(out, &format!("{}:color:#{:06x},#{:06x}", ch.tag, from, to));
            }
            if let Some(parent) = ch.parent {
                push_line(out, &format!("{}:parent:{}", ch.tag, parent));
            }
        }
    }
}

/// Append the four current-value lines: `C<0|1>` then two-digit hex for
/// each slider.
pub fn value_lines(state: &DeviceState, out: &mut ResponseLines) {
    push_line(out, &format!("C{}", u8::from(state.switch)));
    for channel in LampChannel::ALL {
        push_line(
            out,
            &format!("{}{:02x}", slider_tag(channel), state.slider(channel)),
        );
    }
}

fn push_line(out: &mut ResponseLines, text: &str) {
    // The batch capacity covers the largest dump; a lost line here would
    // mean the table outgrew MAX_RESPONSE_LINES.
    if out.push(Line::response(text)).is_err() {
        debug_assert!(false, "response batch overflow");
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &ResponseLines) -> Vec<String> {
        lines
            .iter()
            .map(|l| String::from_utf8_lossy(l.as_bytes()).into_owned())
            .collect()
    }

    #[test]
    fn descriptor_dump_shape() {
        let desc = DeviceDescriptor::new("Lumen");
        let mut out = ResponseLines::new();
        desc.descriptor_lines(&mut out);

        let lines = texts(&out);
        // 1 device line + 4 switch lines + 3 × 6 slider lines.
        assert_eq!(lines.len(), 1 + 4 + 3 * 6);
        assert_eq!(lines[0], "device:name:Lumen\n");
        assert_eq!(lines[1], "C:name:RGB\n");
        assert_eq!(lines[2], "C:type:switch\n");
        assert_eq!(lines[3], "C:mode:sink\n");
        assert_eq!(lines[4], "C:method:push\n");
        assert_eq!(lines[5], "D:name:Slider Red\n");
        assert!(lines.contains(&"D:color:#000000,#ff0000\n".to_string()));
        assert!(lines.contains(&"E:color:#000000,#00ff00\n".to_string()));
        assert!(lines.contains(&"F:color:#000000,#0000ff\n".to_string()));
        assert!(lines.contains(&"F:parent:C\n".to_string()));
    }

    #[test]
    fn switch_channel_has_no_gradient_or_parent() {
        let desc = DeviceDescriptor::new("Lumen");
        let mut out = ResponseLines::new();
        desc.descriptor_lines(&mut out);
        for line in texts(&out) {
            assert!(!line.starts_with("C:color"));
            assert!(!line.starts_with("C:parent"));
        }
    }

    #[test]
    fn value_lines_zero_padded_hex() {
        let state = DeviceState {
            switch: true,
            red: 0xff,
            green: 0x05,
            blue: 0,
        };
        let mut out = ResponseLines::new();
        value_lines(&state, &mut out);
        assert_eq!(
            texts(&out),
            ["C1\n", "Dff\n", "E05\n", "F00\n"]
        );
    }

    #[test]
    fn value_lines_fresh_state() {
        let mut out = ResponseLines::new();
        value_lines(&DeviceState::default(), &mut out);
        assert_eq!(texts(&out), ["C0\n", "D00\n", "E00\n", "F00\n"]);
    }

    #[test]
    fn full_dump_fits_batch_capacity() {
        let desc = DeviceDescriptor::new("Lumen");
        let mut out = ResponseLines::new();
        desc.descriptor_lines(&mut out);
        value_lines(&DeviceState::default(), &mut out);
        assert!(out.len() <= MAX_RESPONSE_LINES);
        assert_eq!(out.len(), 27);
    }
}

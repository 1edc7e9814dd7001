//! Fuzz target: `Command::parse`
//!
//! The grammar must be total: any byte sequence either parses to a
//! command or is rejected, without panicking. Slider values must land in
//! the 8-bit range whatever the input.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use lumen::app::commands::Command;
use lumen::link::Line;

fuzz_target!(|data: &[u8]| {
    match Command::parse(&Line::from(data)) {
        Some(Command::SetSlider { value, .. }) => {
            // u8 by construction; the parse clamped whatever came in.
            let _ = value;
        }
        Some(Command::SetSwitch(_)) => {
            assert!(data.len() >= 3 && data[0] == b'C' && data[1] == b'=');
        }
        Some(Command::GetConfig) => {
            assert_eq!(data, b"get config");
        }
        None => {}
    }
});

//! Fuzz target: `LineAssembler::feed`
//!
//! Drives arbitrary byte sequences into the streaming line assembler and
//! asserts that it never panics, never yields an empty or
//! terminator-bearing line, and accounts for every byte.
//!
//! cargo fuzz run fuzz_line_assembler

#![no_main]

use libfuzzer_sys::fuzz_target;
use lumen::link::LineAssembler;

fuzz_target!(|data: &[u8]| {
    let mut asm = LineAssembler::new();
    let mut emitted = 0usize;

    for &byte in data {
        if let Some(line) = asm.feed(byte) {
            assert!(!line.is_empty(), "assembler must not emit empty lines");
            assert!(
                !line.as_bytes().contains(&b'\r') && !line.as_bytes().contains(&b'\n'),
                "terminators must never appear inside a line"
            );
            emitted += line.len();
        }
    }

    let terminators = data.iter().filter(|&&b| b == b'\r' || b == b'\n').count();
    assert_eq!(
        emitted + asm.pending_len() + terminators,
        data.len(),
        "every byte is either emitted, pending, or a terminator"
    );

    // After a reset the assembler must accept bytes cleanly again.
    asm.reset();
    let _ = asm.feed(b'x');
});

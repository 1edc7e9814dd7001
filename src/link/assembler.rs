//! Streaming line assembler.
//!
//! Reassembles a fragmented inbound byte stream into discrete lines. A
//! single `read` from the transport may deliver part of a line, one line,
//! or several lines concatenated; the assembler is fed one byte at a time
//! and yields a [`Line`] whenever a terminator completes a non-empty
//! buffer. Repeated terminators (`\r\n` pairs, blank lines) collapse
//! silently — empty lines are never emitted.

use log::warn;

use super::line::Line;

/// Initial capacity reserved when the first byte of a line arrives.
const INITIAL_LINE_CAPACITY: usize = 16;

/// Byte-at-a-time line reassembly.
///
/// Non-blocking and allocation-failure tolerant: if the pending buffer
/// cannot grow, the partial line is discarded and assembly resumes at the
/// next terminator.
pub struct LineAssembler {
    pending: Vec<u8>,
    /// Set after an allocation failure: swallow bytes until the next
    /// terminator re-synchronises the stream.
    discarding: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one received byte.
    ///
    /// Returns `Some(Line)` when a terminator completes a non-empty line.
    /// Must not block — this runs in the transport delivery context.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        if byte == b'\r' || byte == b'\n' {
            self.discarding = false;
            if self.pending.is_empty() {
                return None;
            }
            return Some(Line::from_bytes(core::mem::take(&mut self.pending)));
        }

        if self.discarding {
            return None;
        }

        if self.pending.len() == self.pending.capacity() {
            let grow = self.pending.capacity().max(INITIAL_LINE_CAPACITY);
            if self.pending.try_reserve(grow).is_err() {
                warn!(
                    "line assembler: out of memory at {} bytes, discarding partial line",
                    self.pending.len()
                );
                self.pending = Vec::new();
                self.discarding = true;
                return None;
            }
        }
        self.pending.push(byte);
        None
    }

    /// Number of buffered bytes in the partially assembled line.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any partial line (e.g. on transport connect/disconnect).
    pub fn reset(&mut self) {
        self.pending.clear();
        self.discarding = false;
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(asm: &mut LineAssembler, bytes: &[u8]) -> Vec<Line> {
        bytes.iter().filter_map(|&b| asm.feed(b)).collect()
    }

    #[test]
    fn buffers_until_terminator() {
        let mut asm = LineAssembler::new();
        let lines = feed_all(&mut asm, b"get confi");
        assert!(lines.is_empty());
        assert_eq!(asm.pending_len(), 9);
    }

    #[test]
    fn emits_line_on_terminator() {
        let mut asm = LineAssembler::new();
        let lines = feed_all(&mut asm, b"get config\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_bytes(), b"get config");
        assert_eq!(asm.pending_len(), 0);
    }

    #[test]
    fn cr_and_lf_both_terminate() {
        let mut asm = LineAssembler::new();
        let lines = feed_all(&mut asm, b"C=1\rD=ff\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_bytes(), b"C=1");
        assert_eq!(lines[1].as_bytes(), b"D=ff");
    }

    #[test]
    fn consecutive_terminators_collapse() {
        let mut asm = LineAssembler::new();
        let lines = feed_all(&mut asm, b"\r\n\r\nC=0\r\n\n\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_bytes(), b"C=0");
    }

    #[test]
    fn empty_input_emits_nothing() {
        let mut asm = LineAssembler::new();
        assert!(feed_all(&mut asm, b"\n").is_empty());
        assert!(feed_all(&mut asm, b"\r\r\r").is_empty());
    }

    #[test]
    fn line_split_across_feeds() {
        let mut asm = LineAssembler::new();
        assert!(feed_all(&mut asm, b"E=a").is_empty());
        let lines = feed_all(&mut asm, b"b\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_bytes(), b"E=ab");
    }

    #[test]
    fn reset_drops_partial_line() {
        let mut asm = LineAssembler::new();
        let _ = feed_all(&mut asm, b"F=1");
        asm.reset();
        let lines = feed_all(&mut asm, b"2\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_bytes(), b"2");
    }

    #[test]
    fn long_lines_grow_unbounded() {
        let mut asm = LineAssembler::new();
        let body = vec![b'x'; 10_000];
        assert!(feed_all(&mut asm, &body).is_empty());
        let lines = feed_all(&mut asm, b"\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 10_000);
    }
}

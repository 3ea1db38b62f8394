//! Diagnostic output over a serial port
//!
//! Each diagnostic becomes one CRLF-terminated text line. Lines longer than
//! the buffer are truncated; write errors are counted and otherwise ignored
//! so the control loop never blocks on the console.

use core::fmt::Write as _;

use duopass_core::diagnostics::{Diagnostic, DiagnosticSink};
use embedded_io::Write;
use heapless::String;

/// Maximum length of a single line, excluding the terminator
pub const LINE_CAPACITY: usize = 128;

/// Sink writing diagnostics as text lines to a serial port
pub struct SerialSink<W> {
    writer: W,
    dropped: u32,
}

impl<W: Write> SerialSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, dropped: 0 }
    }

    /// Number of lines lost to write errors
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Release the underlying writer
    pub fn release(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for SerialSink<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let mut line: String<LINE_CAPACITY> = String::new();
        // Overflow leaves the prefix that fit
        let _ = write!(line, "{}", diagnostic);

        let written = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\r\n"));
        if written.is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

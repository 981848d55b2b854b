//! Diagnostics sink for automation passes.
//!
//! The host runtime hands every script an output channel for operator-visible
//! messages. This is that channel's stand-in: an append-only list of lines
//! that callers can inspect, print, or dump to any writer. Lines are part of
//! the observable contract of a pass, not loose logging.

use std::io;

/// Collects the human-readable decision trail of one automation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line. The line is also echoed at debug level so a pass can
    /// be followed in the process log without capturing the sink.
    pub fn line(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(target: "kontor::diagnostics", "{msg}");
        self.lines.push(msg);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Write all lines to an output stream, one per line.
    pub fn write_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(w, "{line}")?;
        }
        Ok(())
    }
}

impl core::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

//! Incremental line splitter for streaming responses
//!
//! The server writes one JSON document per line, but the transport hands
//! us arbitrary byte chunks. The parser buffers bytes until a newline is
//! seen and then releases the complete line:
//! - Buffer: bounded by the longest allowed line plus one chunk
//! - Algorithm: every byte is scanned for `\n` once
//! - Blank lines are dropped
//!
//! The line limit applies to every line, finished or not, and is reported
//! at the position of the offending line. Where the transport splits the
//! body does not change which lines come out or where the error lands.

use crate::errors::{ClientError, Result};

/// Maximum line size (8MB)
pub const MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// Incremental newline-delimited parser
#[derive(Debug)]
pub struct LineParser {
    /// Accumulation buffer
    buffer: Vec<u8>,

    /// Start of the current, not yet released line
    start: usize,

    /// Offset up to which the buffer is known to contain no newline
    scanned: usize,

    /// Maximum bytes allowed for a line, excluding the line terminator
    max_line_bytes: usize,
}

impl LineParser {
    /// Create new parser with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINE_BYTES)
    }

    /// Create parser with custom line limit
    pub fn with_capacity(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096), // Start with 4KB
            start: 0,
            scanned: 0,
            max_line_bytes,
        }
    }

    /// Add bytes to the parser
    ///
    /// Released lines are compacted away first, so only the pending line
    /// and the new bytes stay buffered.
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete, non-blank line
    ///
    /// Yields `LineTooLong` for a complete line over the limit, or for a
    /// pending line that has already outgrown it. The buffer is cleared in
    /// that case; the stream cannot be resynchronised.
    pub fn next_line(&mut self) -> Option<Result<Vec<u8>>> {
        loop {
            let newline = self.buffer[self.scanned..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|pos| pos + self.scanned);

            let Some(end) = newline else {
                self.scanned = self.buffer.len();
                let pending = trim_cr(&self.buffer[self.start..]).len();
                if pending > self.max_line_bytes {
                    return Some(Err(self.overflow(pending)));
                }
                return None;
            };

            let line = trim_cr(&self.buffer[self.start..end]).to_vec();
            self.start = end + 1;
            self.scanned = self.start;

            if line.len() > self.max_line_bytes {
                return Some(Err(self.overflow(line.len())));
            }

            if !is_blank(&line) {
                return Some(Ok(line));
            }
        }
    }

    /// Take whatever is left once the body has ended
    ///
    /// A final line without a trailing newline is still a line.
    pub fn finish(&mut self) -> Option<Result<Vec<u8>>> {
        if let Some(line) = self.next_line() {
            return Some(line);
        }

        let rest = trim_cr(&self.buffer[self.start..]).to_vec();
        self.clear();

        if is_blank(&rest) {
            None
        } else {
            Some(Ok(rest))
        }
    }

    /// Get current buffer size (pending line only)
    pub fn buffer_size(&self) -> usize {
        self.buffer.len() - self.start
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.start = 0;
        self.scanned = 0;
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer_size() == 0
    }

    fn overflow(&mut self, size: usize) -> ClientError {
        self.clear();
        ClientError::LineTooLong {
            size,
            max: self.max_line_bytes,
        }
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

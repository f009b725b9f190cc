//! Rope-backed text buffer for the reference host.
//!
//! All offsets are char offsets, matching what tracking points and the
//! dispatcher deal in. Every mutation reports the `(offset, removed,
//! inserted)` triple it applied so the owning view can feed its change log.

use ropey::Rope;
use std::ops::Range;

/// Read-only view into a text buffer for caret navigation.
pub trait TextBuffer {
    /// Number of lines (always >= 1)
    fn line_count(&self) -> usize;

    /// Length of a specific line in characters (excluding newline)
    fn line_length(&self, line: usize) -> usize;

    /// Total length in characters
    fn len_chars(&self) -> usize;

    /// Get character at position, None if out of bounds
    fn char_at(&self, line: usize, column: usize) -> Option<char>;

    /// Convert (line, column) to char offset
    fn position_to_offset(&self, line: usize, column: usize) -> usize;

    /// Convert char offset to (line, column)
    fn offset_to_position(&self, offset: usize) -> (usize, usize);

    /// Get slice of text as String (by character indices)
    fn slice(&self, range: Range<usize>) -> String;

    /// Get full content as String
    fn content(&self) -> String;
}

/// Mutable buffer operations. Extends TextBuffer.
pub trait TextBufferMut: TextBuffer {
    /// Insert text at char offset, returning the number of chars inserted
    fn insert(&mut self, offset: usize, text: &str) -> usize;

    /// Remove text in char range, returning the number of chars removed
    fn remove(&mut self, range: Range<usize>) -> usize;
}

/// TextBuffer implementation wrapping ropey::Rope.
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    /// Create a RopeBuffer from a string slice
    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    fn line_length(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let len = line_slice.len_chars();
        // Exclude trailing newline if present
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, line: usize, column: usize) -> Option<char> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let line_start = self.rope.line_to_char(line);
        if column >= self.line_length(line) {
            return None;
        }
        Some(self.rope.char(line_start + column))
    }

    fn position_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(line);
        line_start + column.min(self.line_length(line))
    }

    fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        let line_start = self.rope.line_to_char(line);
        (line, clamped - line_start)
    }

    fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }
}

impl TextBufferMut for RopeBuffer {
    fn insert(&mut self, offset: usize, text: &str) -> usize {
        let clamped = offset.min(self.len_chars());
        self.rope.insert(clamped, text);
        text.chars().count()
    }

    fn remove(&mut self, range: Range<usize>) -> usize {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return 0;
        }
        self.rope.remove(start..end);
        end - start
    }
}

//! EditableView - an in-memory single-caret, single-selection text view.
//!
//! This is the host the dispatcher drives in tests, benches and the replay
//! CLI. It behaves like a conventional editor surface: one caret, one
//! selection, commands executed one at a time, every buffer mutation logged
//! for tracking points and journaled for undo.

use std::ops::Range;

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::command::Command;
use crate::host::{CommandStatus, NativeSelection, PointTracker, TextView};
use crate::tracking::{ChangeLog, TrackingMode, TrackingPoint, Version};
use crate::util::{char_type, CharType};

use super::buffer::{RopeBuffer, TextBuffer, TextBufferMut};
use super::history::{EditOperation, UndoGroup, UndoJournal};

/// Lines moved by PageUp/PageDown unless configured otherwise
pub const DEFAULT_PAGE_LINES: usize = 25;

/// Single-caret text view over a rope buffer.
#[derive(Debug, Clone)]
pub struct EditableView<C: Clipboard = MemoryClipboard> {
    buffer: RopeBuffer,
    changes: ChangeLog,
    caret: usize,
    /// Never holds an empty selection
    selection: Option<NativeSelection>,
    /// Column to aim for during consecutive vertical moves
    desired_column: Option<usize>,
    journal: UndoJournal,
    clipboard: C,
    page_lines: usize,
}

impl EditableView<MemoryClipboard> {
    /// View with its own clipboard and journal, caret at offset 0
    pub fn from_text(text: &str) -> Self {
        Self::with_collaborators(text, MemoryClipboard::new(), UndoJournal::new())
    }
}

impl<C: Clipboard> EditableView<C> {
    /// View sharing the given clipboard and undo journal
    pub fn with_collaborators(text: &str, clipboard: C, journal: UndoJournal) -> Self {
        Self {
            buffer: RopeBuffer::from_text(text),
            changes: ChangeLog::new(),
            caret: 0,
            selection: None,
            desired_column: None,
            journal,
            clipboard,
            page_lines: DEFAULT_PAGE_LINES,
        }
    }

    pub fn with_page_lines(mut self, page_lines: usize) -> Self {
        self.page_lines = page_lines.max(1);
        self
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    /// Place the caret and drop the selection (like a plain click)
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.buffer.len_chars());
        self.selection = None;
        self.desired_column = None;
    }

    /// Selected text (empty string if no selection)
    pub fn selected_text(&self) -> String {
        match self.selection {
            Some(sel) => self.buffer.slice(sel.range()),
            None => String::new(),
        }
    }

    /// (line, column) of the caret
    pub fn caret_position(&self) -> (usize, usize) {
        self.buffer.offset_to_position(self.caret)
    }
}

// =============================================================================
// Motion
// =============================================================================

impl<C: Clipboard> EditableView<C> {
    /// Where motion starts: the selection's active end, else the caret
    fn motion_origin(&self, extend: bool) -> usize {
        match self.selection {
            Some(sel) if extend => sel.active,
            _ => self.caret,
        }
    }

    /// Move to `target`, either extending the selection or dropping it
    fn move_to(&mut self, target: usize, extend: bool) {
        let target = target.min(self.buffer.len_chars());
        if extend {
            let anchor = self.selection.map(|s| s.anchor).unwrap_or(self.caret);
            let sel = NativeSelection::new(anchor, target);
            self.selection = (!sel.is_empty()).then_some(sel);
        } else {
            self.selection = None;
        }
        self.caret = target;
    }

    fn move_horizontal(&mut self, target: usize, extend: bool) {
        self.desired_column = None;
        self.move_to(target, extend);
    }

    fn move_left(&mut self, extend: bool) {
        if !extend {
            if let Some(sel) = self.selection {
                return self.move_horizontal(sel.start(), false);
            }
        }
        let origin = self.motion_origin(extend);
        self.move_horizontal(origin.saturating_sub(1), extend);
    }

    fn move_right(&mut self, extend: bool) {
        if !extend {
            if let Some(sel) = self.selection {
                return self.move_horizontal(sel.end(), false);
            }
        }
        let origin = self.motion_origin(extend);
        self.move_horizontal(origin + 1, extend);
    }

    fn move_vertical(&mut self, lines: isize, extend: bool) {
        let origin = self.motion_origin(extend);
        let (line, column) = self.buffer.offset_to_position(origin);
        let last_line = self.buffer.line_count().saturating_sub(1);

        let target_line = if lines < 0 {
            line.saturating_sub(lines.unsigned_abs())
        } else {
            (line + lines as usize).min(last_line)
        };
        if target_line == line {
            // Nothing above/below; keep the selection shape when extending
            if !extend {
                self.move_to(origin, false);
            }
            return;
        }

        let desired = *self.desired_column.get_or_insert(column);
        let target = self.buffer.position_to_offset(target_line, desired);
        self.move_to(target, extend);
    }

    fn move_line_start(&mut self, extend: bool) {
        let (line, _) = self.buffer.offset_to_position(self.motion_origin(extend));
        let target = self.buffer.position_to_offset(line, 0);
        self.move_horizontal(target, extend);
    }

    fn move_line_end(&mut self, extend: bool) {
        let (line, _) = self.buffer.offset_to_position(self.motion_origin(extend));
        let target = self
            .buffer
            .position_to_offset(line, self.buffer.line_length(line));
        self.move_horizontal(target, extend);
    }

    fn move_word_left(&mut self, extend: bool) {
        if !extend {
            if let Some(sel) = self.selection {
                return self.move_horizontal(sel.start(), false);
            }
        }

        let origin = self.motion_origin(extend);
        let (line, column) = self.buffer.offset_to_position(origin);

        // At start of line? Move to end of previous line
        if column == 0 {
            return self.move_horizontal(origin.saturating_sub(1), extend);
        }

        let mut pos = column.min(self.buffer.line_length(line));

        // Skip any whitespace/punctuation first (moving backwards)
        while pos > 0 {
            match self.buffer.char_at(line, pos - 1) {
                Some(ch) if char_type(ch) == CharType::WordChar => break,
                _ => pos -= 1,
            }
        }

        // Then skip word characters
        while pos > 0 {
            match self.buffer.char_at(line, pos - 1) {
                Some(ch) if char_type(ch) != CharType::WordChar => break,
                _ => pos -= 1,
            }
        }

        let target = self.buffer.position_to_offset(line, pos);
        self.move_horizontal(target, extend);
    }

    fn move_word_right(&mut self, extend: bool) {
        if !extend {
            if let Some(sel) = self.selection {
                return self.move_horizontal(sel.end(), false);
            }
        }

        let origin = self.motion_origin(extend);
        let (line, column) = self.buffer.offset_to_position(origin);
        let line_len = self.buffer.line_length(line);

        // At end of line? Move to start of next line
        if column >= line_len {
            return self.move_horizontal(origin + 1, extend);
        }

        let mut pos = column;

        // Skip current word type
        if let Some(first) = self.buffer.char_at(line, pos) {
            let start_type = char_type(first);
            while pos < line_len {
                match self.buffer.char_at(line, pos) {
                    Some(ch) if char_type(ch) == start_type => pos += 1,
                    _ => break,
                }
            }
        }

        // Skip any following whitespace
        while pos < line_len {
            match self.buffer.char_at(line, pos) {
                Some(ch) if char_type(ch) == CharType::Whitespace => pos += 1,
                _ => break,
            }
        }

        let target = self.buffer.position_to_offset(line, pos);
        self.move_horizontal(target, extend);
    }

    fn move_document_start(&mut self, extend: bool) {
        self.move_horizontal(0, extend);
    }

    fn move_document_end(&mut self, extend: bool) {
        self.move_horizontal(self.buffer.len_chars(), extend);
    }
}

// =============================================================================
// Editing
// =============================================================================

impl<C: Clipboard> EditableView<C> {
    /// Apply a mutation to the buffer and the change log, without journaling
    fn apply(&mut self, range: Range<usize>, text: &str) {
        let len = self.buffer.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);

        let removed = self.buffer.remove(start..end);
        let inserted = self.buffer.insert(start, text);
        self.changes.record(start, removed, inserted);
    }

    /// Replace `range` with `text`, journal it, and leave the caret after it
    fn replace(&mut self, range: Range<usize>, text: &str) {
        let caret_before = self.caret;
        let deleted = self.buffer.slice(range.clone());
        if deleted.is_empty() && text.is_empty() {
            return;
        }

        self.apply(range.clone(), text);
        let caret_after = range.start + text.chars().count();
        self.caret = caret_after;
        self.selection = None;
        self.desired_column = None;

        let op = match (deleted.is_empty(), text.is_empty()) {
            (true, _) => EditOperation::insert(range.start, text.to_string(), caret_before, caret_after),
            (false, true) => EditOperation::delete(range.start, deleted, caret_before, caret_after),
            (false, false) => EditOperation::replace(
                range.start,
                deleted,
                text.to_string(),
                caret_before,
                caret_after,
            ),
        };
        self.journal.push(op);
    }

    /// Insert text at the caret, replacing the selection if any
    pub fn insert_text(&mut self, text: &str) {
        let range = match self.selection {
            Some(sel) => sel.range(),
            None => self.caret..self.caret,
        };
        self.replace(range, text);
    }

    fn delete_backward(&mut self) {
        match self.selection {
            Some(sel) => self.replace(sel.range(), ""),
            None if self.caret > 0 => self.replace(self.caret - 1..self.caret, ""),
            None => {}
        }
    }

    fn delete_forward(&mut self) {
        match self.selection {
            Some(sel) => self.replace(sel.range(), ""),
            None if self.caret < self.buffer.len_chars() => {
                self.replace(self.caret..self.caret + 1, "")
            }
            None => {}
        }
    }

    fn copy(&mut self) {
        if let Some(sel) = self.selection {
            let text = self.buffer.slice(sel.range());
            self.clipboard.set_text(&text);
        }
    }

    fn cut(&mut self) {
        if let Some(sel) = self.selection {
            let text = self.buffer.slice(sel.range());
            self.clipboard.set_text(&text);
            self.replace(sel.range(), "");
        }
    }

    fn paste(&mut self) {
        if let Some(text) = self.clipboard.get_text() {
            self.insert_text(&text);
        }
    }

    /// Undo the latest undo step
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.journal.pop_undo() else {
            return false;
        };
        self.revert(&group);
        true
    }

    /// Redo the latest undone step
    pub fn redo(&mut self) -> bool {
        let Some(group) = self.journal.pop_redo() else {
            return false;
        };
        self.reapply(&group);
        true
    }

    fn revert(&mut self, group: &UndoGroup) {
        for op in group.operations.iter().rev() {
            let inserted_end = op.offset + op.inserted_text.chars().count();
            self.apply(op.offset..inserted_end, &op.deleted_text);
        }
        if let Some(first) = group.operations.first() {
            self.set_caret(first.caret_before);
        }
    }

    fn reapply(&mut self, group: &UndoGroup) {
        for op in &group.operations {
            let deleted_end = op.offset + op.deleted_text.chars().count();
            self.apply(op.offset..deleted_end, &op.inserted_text);
        }
        if let Some(last) = group.operations.last() {
            self.set_caret(last.caret_after);
        }
    }
}

// =============================================================================
// Host interface
// =============================================================================

impl<C: Clipboard> PointTracker for EditableView<C> {
    fn track(&self, offset: usize) -> TrackingPoint {
        self.changes
            .track(offset.min(self.buffer.len_chars()), TrackingMode::Positive)
    }

    fn resolve(&self, point: &TrackingPoint) -> usize {
        self.changes.resolve(point).min(self.buffer.len_chars())
    }

    fn text_in(&self, range: Range<usize>) -> String {
        self.buffer.slice(range)
    }

    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn release_before(&mut self, horizon: Version) {
        self.changes.compact(horizon);
    }
}

impl<C: Clipboard> TextView for EditableView<C> {
    fn caret(&self) -> usize {
        self.caret
    }

    fn move_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.buffer.len_chars());
        self.desired_column = None;
    }

    fn selection(&self) -> Option<NativeSelection> {
        self.selection.filter(|s| !s.is_empty())
    }

    fn select(&mut self, range: Range<usize>, reversed: bool) {
        let len = self.buffer.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        let sel = NativeSelection::from_range(range, reversed);
        self.caret = sel.active;
        self.selection = (!sel.is_empty()).then_some(sel);
        self.desired_column = None;
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn exec(&mut self, command: &Command) -> CommandStatus {
        use Command::*;

        match *command {
            MoveCursorLeft => self.move_left(false),
            MoveCursorRight => self.move_right(false),
            MoveCursorUp => self.move_vertical(-1, false),
            MoveCursorDown => self.move_vertical(1, false),
            MoveCursorWordLeft => self.move_word_left(false),
            MoveCursorWordRight => self.move_word_right(false),
            MoveCursorLineStart => self.move_line_start(false),
            MoveCursorLineEnd => self.move_line_end(false),
            MoveCursorDocumentStart => self.move_document_start(false),
            MoveCursorDocumentEnd => self.move_document_end(false),
            PageUp => self.move_vertical(-(self.page_lines as isize), false),
            PageDown => self.move_vertical(self.page_lines as isize, false),

            MoveCursorLeftWithSelection => self.move_left(true),
            MoveCursorRightWithSelection => self.move_right(true),
            MoveCursorUpWithSelection => self.move_vertical(-1, true),
            MoveCursorDownWithSelection => self.move_vertical(1, true),
            MoveCursorWordLeftWithSelection => self.move_word_left(true),
            MoveCursorWordRightWithSelection => self.move_word_right(true),
            MoveCursorLineStartWithSelection => self.move_line_start(true),
            MoveCursorLineEndWithSelection => self.move_line_end(true),
            MoveCursorDocumentStartWithSelection => self.move_document_start(true),
            MoveCursorDocumentEndWithSelection => self.move_document_end(true),

            Cancel => self.selection = None,

            Copy => self.copy(),
            Cut => self.cut(),
            Paste => self.paste(),
            Undo => {
                self.undo();
            }
            Redo => {
                self.redo();
            }

            InsertChar(ch) => self.insert_text(&ch.to_string()),
            InsertNewline => self.insert_text("\n"),
            InsertTab => self.insert_text("\t"),
            DeleteBackward => self.delete_backward(),
            DeleteForward => self.delete_forward(),

            SelectSolutionPlatform | SelectSolutionConfiguration | Host { .. } => {
                return CommandStatus::NotSupported
            }
        }
        CommandStatus::Handled
    }

    fn insert_newline(&mut self) {
        self.insert_text("\n");
    }
}

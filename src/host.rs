//! Interfaces to the single-selection host editor.
//!
//! The dispatcher never touches a text buffer directly. Everything it needs
//! from the editor it is embedded in goes through the traits in this module:
//!
//! - [`PointTracker`]: create and resolve tracking positions, read text
//! - [`TextView`]: the host's one native caret and one native selection, and
//!   its command execution primitive
//! - [`UndoContext`]: the document-wide undo transaction scope
//! - [`Renderer`]: receives a redraw notification after each fan-out

use std::ops::Range;

use serde::Serialize;

use crate::command::Command;
use crate::selection_set::ResolvedSelection;
use crate::tracking::{TrackingPoint, Version};

/// Result of forwarding a command to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandStatus {
    /// The host executed the command
    Handled,
    /// The host (or the dispatcher's denylist) does not handle this command
    NotSupported,
    /// The host tried and failed
    Failed,
}

impl CommandStatus {
    pub fn is_handled(&self) -> bool {
        matches!(self, CommandStatus::Handled)
    }
}

/// The host's native selection: an anchor that stays put and an active end
/// that moves while the selection is extended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeSelection {
    pub anchor: usize,
    pub active: usize,
}

impl NativeSelection {
    pub fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    /// Build a selection over `range`; `reversed` puts the active end at the start.
    pub fn from_range(range: Range<usize>, reversed: bool) -> Self {
        if reversed {
            Self::new(range.end, range.start)
        } else {
            Self::new(range.start, range.end)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.active)
    }

    /// Normalized range, `start <= end` regardless of direction
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Active end before the anchor
    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }
}

/// Creates and resolves tracking positions over the host's current text.
pub trait PointTracker {
    /// Create a point at `offset` (positive tracking).
    fn track(&self, offset: usize) -> TrackingPoint;

    /// Current offset of a point created earlier.
    fn resolve(&self, point: &TrackingPoint) -> usize;

    /// Text in a char range of the current buffer.
    fn text_in(&self, range: Range<usize>) -> String;

    /// Buffer length in chars.
    fn len_chars(&self) -> usize;

    /// The caller holds no point created before `horizon` any more.
    ///
    /// Hosts may drop the edit history older than that. The default keeps it.
    fn release_before(&mut self, _horizon: Version) {}
}

/// A single-caret, single-selection text view.
pub trait TextView: PointTracker {
    /// Native caret offset.
    fn caret(&self) -> usize;

    /// Move the native caret. Does not change the native selection.
    fn move_caret(&mut self, offset: usize);

    /// Native selection, or `None` when it is empty.
    fn selection(&self) -> Option<NativeSelection>;

    /// Select `range`, with the active end at the start when `reversed`.
    fn select(&mut self, range: Range<usize>, reversed: bool);

    /// Drop the native selection (the caret stays where it is).
    fn clear_selection(&mut self);

    /// Execute one command against the native caret/selection.
    fn exec(&mut self, command: &Command) -> CommandStatus;

    /// Insert a line break at the caret.
    fn insert_newline(&mut self);
}

/// Document-wide undo transaction scope.
pub trait UndoContext {
    fn is_open(&self) -> bool;

    /// Open a transaction; edits until [`UndoContext::close`] undo as one step.
    fn open(&mut self, name: &str);

    fn close(&mut self);
}

/// Paints the extra carets and highlights for the active selections.
pub trait Renderer {
    fn redraw(&mut self, selections: &[ResolvedSelection]);
}

/// Renderer for hosts that draw nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn redraw(&mut self, _selections: &[ResolvedSelection]) {}
}

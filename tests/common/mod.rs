//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::ops::Range;

use multicaret::clipboard::MemoryClipboard;
use multicaret::command::Command;
use multicaret::dispatch::Dispatcher;
use multicaret::editable::{EditableView, UndoJournal};
use multicaret::host::{CommandStatus, NativeSelection, PointTracker, Renderer, TextView};
use multicaret::selection_set::{ResolvedSelection, Selection};
use multicaret::tracking::TrackingPoint;

pub type TestDispatcher<V = EditableView> = Dispatcher<V, MemoryClipboard, UndoJournal, RedrawLog>;

/// Renderer that records every redraw
#[derive(Debug, Default)]
pub struct RedrawLog {
    pub frames: Vec<Vec<ResolvedSelection>>,
}

impl RedrawLog {
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn last(&self) -> Option<&[ResolvedSelection]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl Renderer for RedrawLog {
    fn redraw(&mut self, selections: &[ResolvedSelection]) {
        self.frames.push(selections.to_vec());
    }
}

/// View wrapper whose `fail_on`-th exec (1-based) fails without doing anything
#[derive(Debug)]
pub struct FlakyView {
    pub inner: EditableView,
    pub fail_on: usize,
    pub calls: usize,
}

impl PointTracker for FlakyView {
    fn track(&self, offset: usize) -> TrackingPoint {
        self.inner.track(offset)
    }

    fn resolve(&self, point: &TrackingPoint) -> usize {
        self.inner.resolve(point)
    }

    fn text_in(&self, range: Range<usize>) -> String {
        self.inner.text_in(range)
    }

    fn len_chars(&self) -> usize {
        self.inner.len_chars()
    }
}

impl TextView for FlakyView {
    fn caret(&self) -> usize {
        self.inner.caret()
    }

    fn move_caret(&mut self, offset: usize) {
        self.inner.move_caret(offset)
    }

    fn selection(&self) -> Option<NativeSelection> {
        self.inner.selection()
    }

    fn select(&mut self, range: Range<usize>, reversed: bool) {
        self.inner.select(range, reversed)
    }

    fn clear_selection(&mut self) {
        self.inner.clear_selection()
    }

    fn exec(&mut self, command: &Command) -> CommandStatus {
        self.calls += 1;
        if self.calls == self.fail_on {
            return CommandStatus::Failed;
        }
        self.inner.exec(command)
    }

    fn insert_newline(&mut self) {
        self.inner.insert_newline()
    }
}

fn view_and_collaborators(text: &str) -> (EditableView, MemoryClipboard, UndoJournal) {
    let clipboard = MemoryClipboard::new();
    let journal = UndoJournal::new();
    let view = EditableView::with_collaborators(text, clipboard.clone(), journal.clone());
    (view, clipboard, journal)
}

/// Dispatcher over `text` with one caret-only selection per entry of `carets`
pub fn test_dispatcher(text: &str, carets: &[usize]) -> TestDispatcher {
    let (view, clipboard, journal) = view_and_collaborators(text);
    let mut d = Dispatcher::new(view, clipboard, journal, RedrawLog::default());
    for &caret in carets {
        d.view_mut().set_caret(caret);
        d.add_current_caret();
    }
    d
}

/// Dispatcher with one selection per `(caret, range)` pair
pub fn test_dispatcher_with_ranges(
    text: &str,
    selections: &[(usize, Option<Range<usize>>)],
) -> TestDispatcher {
    let mut d = test_dispatcher(text, &[]);
    for (caret, range) in selections {
        let selection = Selection::at(d.view(), *caret, range.clone());
        d.selections_mut().push(selection);
    }
    d
}

/// Dispatcher whose view fails the `fail_on`-th exec
pub fn flaky_dispatcher(text: &str, carets: &[usize], fail_on: usize) -> TestDispatcher<FlakyView> {
    let (view, clipboard, journal) = view_and_collaborators(text);
    let view = FlakyView {
        inner: view,
        fail_on,
        calls: 0,
    };
    let mut d = Dispatcher::new(view, clipboard, journal, RedrawLog::default());
    for &caret in carets {
        d.view_mut().inner.set_caret(caret);
        d.add_current_caret();
    }
    d
}

/// Resolved caret offsets in selection order
pub fn carets<V: TextView>(d: &TestDispatcher<V>) -> Vec<usize> {
    resolved(d).iter().map(|s| s.caret).collect()
}

pub fn resolved<V: TextView>(d: &TestDispatcher<V>) -> Vec<ResolvedSelection> {
    d.selections().resolved(d.view())
}

pub fn caret(offset: usize) -> ResolvedSelection {
    ResolvedSelection {
        caret: offset,
        range: None,
    }
}

pub fn ranged(caret: usize, range: Range<usize>) -> ResolvedSelection {
    ResolvedSelection {
        caret,
        range: Some(range),
    }
}

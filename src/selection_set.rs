//! Selection records and the ordered set of active selections.
//!
//! A [`Selection`] holds [`TrackingPoint`]s, never raw offsets, so it stays
//! valid while the host edits the buffer during a fan-out. Offsets only
//! exist in [`ResolvedSelection`], computed on demand from a
//! [`PointTracker`].
//!
//! The set knows nothing about commands. It keeps the structural invariants
//! (insertion order, no duplicates after [`SelectionSet::remove_duplicates`],
//! ranges present on both ends or neither) and the session state shared by
//! all selections: the reversing flag, the search text and the clipboard
//! ring.

use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;

use crate::host::{PointTracker, TextView};
use crate::tracking::{TrackingPoint, Version};

/// Both ends of a selected range. `start` resolves at or before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedSpan {
    start: TrackingPoint,
    end: TrackingPoint,
}

impl TrackedSpan {
    pub fn new(start: TrackingPoint, end: TrackingPoint) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> &TrackingPoint {
        &self.start
    }

    pub fn end(&self) -> &TrackingPoint {
        &self.end
    }

    /// Current range, normalized so `start <= end`
    pub fn resolve(&self, tracker: &impl PointTracker) -> Range<usize> {
        let a = tracker.resolve(&self.start);
        let b = tracker.resolve(&self.end);
        a.min(b)..a.max(b)
    }
}

/// One independent caret, optionally with a selected range, plus the text
/// a multi-copy/cut captured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    caret: TrackingPoint,
    span: Option<TrackedSpan>,
    copied_text: String,
}

impl Selection {
    pub fn caret_only(caret: TrackingPoint) -> Self {
        Self {
            caret,
            span: None,
            copied_text: String::new(),
        }
    }

    pub fn with_span(caret: TrackingPoint, span: TrackedSpan) -> Self {
        Self {
            caret,
            span: Some(span),
            copied_text: String::new(),
        }
    }

    /// Track a caret (and optional range) at the host's current offsets.
    pub fn at(tracker: &impl PointTracker, caret: usize, range: Option<Range<usize>>) -> Self {
        let caret = tracker.track(caret);
        match range {
            Some(range) => {
                let start = range.start.min(range.end);
                let end = range.start.max(range.end);
                Self::with_span(
                    caret,
                    TrackedSpan::new(tracker.track(start), tracker.track(end)),
                )
            }
            None => Self::caret_only(caret),
        }
    }

    pub fn caret(&self) -> &TrackingPoint {
        &self.caret
    }

    pub fn span(&self) -> Option<&TrackedSpan> {
        self.span.as_ref()
    }

    pub fn has_range(&self) -> bool {
        self.span.is_some()
    }

    pub fn copied_text(&self) -> &str {
        &self.copied_text
    }

    /// Same selection with a new caret
    pub fn with_caret(self, caret: TrackingPoint) -> Self {
        Self { caret, ..self }
    }

    /// Same selection with a new range
    pub fn with_range(self, span: TrackedSpan) -> Self {
        Self {
            span: Some(span),
            ..self
        }
    }

    /// Demoted to caret-only
    pub fn collapsed(self) -> Self {
        Self { span: None, ..self }
    }

    pub fn with_copied_text(self, copied_text: String) -> Self {
        Self {
            copied_text,
            ..self
        }
    }

    pub fn resolve(&self, tracker: &impl PointTracker) -> ResolvedSelection {
        ResolvedSelection {
            caret: tracker.resolve(&self.caret),
            range: self.span.as_ref().map(|span| span.resolve(tracker)),
        }
    }

    /// The range is non-empty and the caret sits at its start.
    pub fn is_reversed(&self, tracker: &impl PointTracker) -> bool {
        let resolved = self.resolve(tracker);
        match resolved.range {
            Some(range) => !range.is_empty() && resolved.caret == range.start,
            None => false,
        }
    }
}

/// A selection resolved to concrete char offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedSelection {
    pub caret: usize,
    pub range: Option<Range<usize>>,
}

/// Ordered collection of active selections plus session state.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: Vec<Selection>,
    is_reversing: bool,
    search_text: String,
    clipboard_ring: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty set means multi-select mode is off.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&Selection> {
        self.items.last()
    }

    /// Append a caret-only selection at the host's native caret.
    ///
    /// Does not de-duplicate.
    pub fn add_current_caret(&mut self, view: &impl TextView) {
        let caret = view.track(view.caret());
        tracing::debug!(
            target: "selection",
            caret = view.caret(),
            count = self.items.len() + 1,
            "add caret"
        );
        self.items.push(Selection::caret_only(caret));
    }

    /// Append an arbitrary selection (used by occurrence search).
    pub fn push(&mut self, selection: Selection) {
        self.items.push(selection);
    }

    /// Remove later duplicates, keeping the first occurrence of each.
    ///
    /// Two selections are duplicates when their carets resolve to the same
    /// offset and their ranges resolve equal (or are both absent).
    pub fn remove_duplicates(&mut self, tracker: &impl PointTracker) {
        let before = self.items.len();
        let mut seen: HashSet<ResolvedSelection> = HashSet::with_capacity(before);

        self.items.retain(|selection| seen.insert(selection.resolve(tracker)));

        if self.items.len() != before {
            tracing::debug!(
                target: "selection",
                removed = before - self.items.len(),
                remaining = self.items.len(),
                "removed duplicate selections"
            );
        }
    }

    /// Drop every selection and reset the reversing flag.
    pub fn discard_selections(&mut self) {
        if !self.items.is_empty() {
            tracing::debug!(target: "selection", count = self.items.len(), "discard selections");
        }
        self.items.clear();
        self.is_reversing = false;
    }

    pub fn clear_saved_clipboard(&mut self) {
        self.clipboard_ring.clear();
    }

    /// Replace the clipboard ring with the payloads of a multi-copy/cut.
    pub fn save_clipboard(&mut self, texts: Vec<String>) {
        self.clipboard_ring = texts;
    }

    pub fn clipboard_ring(&self) -> &[String] {
        &self.clipboard_ring
    }

    pub fn is_reversing(&self) -> bool {
        self.is_reversing
    }

    pub fn set_reversing(&mut self, reversing: bool) {
        self.is_reversing = reversing;
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Recompute the search text from the last selection's range.
    ///
    /// Left unchanged when the last selection is caret-only.
    pub fn refresh_search_text(&mut self, tracker: &impl PointTracker) {
        let Some(range) = self
            .items
            .last()
            .and_then(|s| s.span())
            .map(|span| span.resolve(tracker))
        else {
            return;
        };
        self.search_text = tracker.text_in(range);
    }

    /// Demote every selection to caret-only.
    pub fn collapse_all(&mut self) {
        self.items = std::mem::take(&mut self.items)
            .into_iter()
            .map(Selection::collapsed)
            .collect();
    }

    /// Every selection carries multi-copied text
    pub fn all_copied(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|s| !s.copied_text().is_empty())
    }

    pub fn clear_copied_text(&mut self) {
        self.items = std::mem::take(&mut self.items)
            .into_iter()
            .map(|s| s.with_copied_text(String::new()))
            .collect();
    }

    /// No selection has a range
    pub fn is_caret_only(&self) -> bool {
        self.items.iter().all(|s| !s.has_range())
    }

    /// Re-track every selection at its current offsets.
    ///
    /// Resolving a point costs one step per change since it was created, so
    /// selections that live through many passes are rebased after each one.
    pub fn rebase(&mut self, tracker: &impl PointTracker) {
        for selection in &mut self.items {
            let resolved = selection.resolve(tracker);
            selection.caret = tracker.track(resolved.caret);
            selection.span = resolved.range.map(|range| {
                TrackedSpan::new(tracker.track(range.start), tracker.track(range.end))
            });
        }
    }

    /// Version of the oldest point any selection holds
    pub fn oldest_version(&self) -> Option<Version> {
        self.items
            .iter()
            .flat_map(|s| {
                let span = s.span.iter().flat_map(|span| [span.start, span.end]);
                std::iter::once(s.caret).chain(span)
            })
            .map(|point| point.version())
            .min()
    }

    pub fn resolved(&self, tracker: &impl PointTracker) -> Vec<ResolvedSelection> {
        self.items.iter().map(|s| s.resolve(tracker)).collect()
    }

    /// Move the items out for a replay pass.
    pub(crate) fn take_items(&mut self) -> Vec<Selection> {
        std::mem::take(&mut self.items)
    }

    /// Put the items back after a replay pass.
    pub(crate) fn restore_items(&mut self, items: Vec<Selection>) {
        self.items = items;
    }
}

//! Clipboard behavior tests
//!
//! Tests for per-selection copy/cut/paste and the clipboard ring
//! replayed by a single-caret paste.

mod common;

use common::{caret, carets, resolved, test_dispatcher, test_dispatcher_with_ranges};
use multicaret::clipboard::Clipboard;
use multicaret::command::Command;
use multicaret::host::{CommandStatus, TextView};

fn copied_texts(d: &common::TestDispatcher) -> Vec<String> {
    d.selections()
        .iter()
        .map(|s| s.copied_text().to_string())
        .collect()
}

/// Multi-copy "a", "b", "c", then leave multi-select with the caret at the end
fn ring_of_three() -> common::TestDispatcher {
    let mut d = test_dispatcher_with_ranges(
        "a b c\n",
        &[(1, Some(0..1)), (3, Some(2..3)), (5, Some(4..5))],
    );
    d.dispatch(&Command::Copy);
    d.dispatch(&Command::Cancel);
    d.view_mut().set_caret(6);
    d
}

// ========================================================================
// Multi Copy/Cut Tests
// ========================================================================

#[test]
fn test_copy_stores_text_per_selection() {
    let mut d = test_dispatcher_with_ranges(
        "alpha beta gamma",
        &[(5, Some(0..5)), (10, Some(6..10)), (16, Some(11..16))],
    );

    let status = d.dispatch(&Command::Copy);

    assert_eq!(status, CommandStatus::Handled);
    assert_eq!(copied_texts(&d), vec!["alpha", "beta", "gamma"]);
    assert_eq!(d.selections().clipboard_ring(), ["alpha", "beta", "gamma"]);
    assert_eq!(
        d.clipboard().text().as_deref(),
        Some("gamma"),
        "Live clipboard holds the last selection's text"
    );
    assert_eq!(d.selections().len(), 3, "Ranges survive a copy");
    assert!(!d.selections().is_caret_only());
    assert_eq!(d.view().selection(), None);
}

#[test]
fn test_copy_paste_round_trip_gives_each_selection_its_own_text() {
    let mut d = test_dispatcher_with_ranges(
        "alpha beta gamma",
        &[(5, Some(0..5)), (10, Some(6..10)), (16, Some(11..16))],
    );
    d.dispatch(&Command::Copy);
    d.dispatch(&Command::MoveCursorRight);
    assert_eq!(carets(&d), vec![5, 10, 16]);

    d.dispatch(&Command::Paste);

    assert_eq!(d.view().text(), "alphaalpha betabeta gammagamma");
    assert_eq!(carets(&d), vec![10, 19, 30]);
    assert_eq!(d.undo_context().undo_count(), 1, "Paste is one undo step");
}

#[test]
fn test_cut_then_paste_restores_text() {
    let mut d = test_dispatcher_with_ranges("one two", &[(3, Some(0..3)), (7, Some(4..7))]);

    d.dispatch(&Command::Cut);
    assert_eq!(d.view().text(), " ");
    assert_eq!(resolved(&d), vec![caret(0), caret(1)], "Cut ranges collapse to carets");
    assert_eq!(copied_texts(&d), vec!["one", "two"]);

    d.dispatch(&Command::Paste);
    assert_eq!(d.view().text(), "one two");
    assert_eq!(carets(&d), vec![3, 7]);
}

#[test]
fn test_copy_skips_caret_only_selections() {
    let mut d = test_dispatcher_with_ranges("abc def", &[(3, Some(0..3)), (5, None)]);

    d.dispatch(&Command::Copy);

    assert_eq!(copied_texts(&d), vec!["abc", ""]);
    assert_eq!(d.selections().clipboard_ring(), ["abc"]);
}

#[test]
fn test_paste_without_copies_uses_live_clipboard() {
    let mut d = test_dispatcher("ab", &[0, 2]);
    d.clipboard_mut().set_text("Z");

    d.dispatch(&Command::Paste);

    assert_eq!(d.view().text(), "ZabZ");
    assert_eq!(carets(&d), vec![1, 4]);
}

#[test]
fn test_new_copy_replaces_old_copied_text() {
    let mut d = test_dispatcher_with_ranges("ab cd", &[(2, Some(0..2)), (5, Some(3..5))]);
    d.dispatch(&Command::Copy);
    d.dispatch(&Command::MoveCursorLeftWithSelection);

    d.dispatch(&Command::Copy);

    assert_eq!(copied_texts(&d), vec!["a", "c"]);
}

// ========================================================================
// Clipboard Ring Tests
// ========================================================================

#[test]
fn test_single_caret_paste_replays_ring_on_lines() {
    let mut d = ring_of_three();
    let steps_before = d.undo_context().undo_count();

    let status = d.dispatch(&Command::Paste);

    assert_eq!(status, CommandStatus::Handled);
    assert_eq!(d.view().text(), "a b c\na\nb\nc");
    assert_eq!(d.undo_context().undo_count(), steps_before + 1, "One transaction");

    d.dispatch(&Command::Undo);
    assert_eq!(d.view().text(), "a b c\n");
}

#[test]
fn test_stale_ring_is_cleared_and_paste_forwarded() {
    let mut d = ring_of_three();
    d.clipboard_mut().set_text("x");

    d.dispatch(&Command::Paste);

    assert_eq!(d.view().text(), "a b c\nx");
    assert!(d.selections().clipboard_ring().is_empty());

    d.dispatch(&Command::Paste);
    assert_eq!(d.view().text(), "a b c\nxx");
}

#[test]
fn test_single_copy_clears_ring() {
    let mut d = ring_of_three();
    d.view_mut().select(0..1, false);

    d.dispatch(&Command::Copy);

    assert!(d.selections().clipboard_ring().is_empty());
    assert_eq!(d.clipboard().text().as_deref(), Some("a"));
}

#[test]
fn test_single_entry_ring_pastes_normally() {
    let mut d = test_dispatcher_with_ranges("hi there", &[(2, Some(0..2)), (4, None)]);
    d.dispatch(&Command::Copy);
    d.dispatch(&Command::Cancel);
    d.view_mut().set_caret(8);

    d.dispatch(&Command::Paste);

    assert_eq!(d.view().text(), "hi therehi");
    assert_eq!(d.selections().clipboard_ring(), ["hi"]);
}

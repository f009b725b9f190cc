//! Seeding the selection set from pointer clicks.
//!
//! A mouse handler calls [`before_click`] before the host processes a click
//! and [`after_click`] once it has, passing whether the add-caret modifier
//! (Alt) was held. Modified clicks accumulate carets; a plain click leaves
//! multi-select mode. Clicks that produce a native selection (drags) leave
//! the set alone.

use crate::clipboard::Clipboard;
use crate::dispatch::Dispatcher;
use crate::host::{Renderer, TextView, UndoContext};

/// Capture the pre-click caret when starting a multi-select with a modified click.
pub fn before_click<V, C, U, R>(dispatcher: &mut Dispatcher<V, C, U, R>, add_modifier: bool)
where
    V: TextView,
    C: Clipboard,
    U: UndoContext,
    R: Renderer,
{
    if dispatcher.view().selection().is_some() || !dispatcher.selections().is_empty() {
        return;
    }

    if add_modifier {
        tracing::debug!(target: "selection", "modified click seeds current caret");
        dispatcher.add_current_caret();
    } else {
        dispatcher.discard_selections();
    }
}

/// Add the clicked caret (modified click) or leave multi-select mode.
pub fn after_click<V, C, U, R>(dispatcher: &mut Dispatcher<V, C, U, R>, add_modifier: bool)
where
    V: TextView,
    C: Clipboard,
    U: UndoContext,
    R: Renderer,
{
    if dispatcher.view().selection().is_some() {
        return;
    }

    if add_modifier {
        dispatcher.add_current_caret();
    } else if !dispatcher.selections().is_empty() {
        tracing::debug!(target: "selection", "plain click leaves multi-select");
        dispatcher.discard_selections();
    }
    dispatcher.redraw();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::editable::{EditableView, UndoJournal};
    use crate::host::NoopRenderer;

    type TestDispatcher = Dispatcher<EditableView, MemoryClipboard, UndoJournal, NoopRenderer>;

    fn dispatcher() -> TestDispatcher {
        let view = EditableView::from_text("hello world");
        Dispatcher::new(view, MemoryClipboard::new(), UndoJournal::new(), NoopRenderer)
    }

    fn click(d: &mut TestDispatcher, at: usize, alt: bool) {
        before_click(d, alt);
        d.view_mut().set_caret(at);
        after_click(d, alt);
    }

    #[test]
    fn test_alt_clicks_accumulate() {
        let mut d = dispatcher();
        d.view_mut().set_caret(2);
        click(&mut d, 6, true);
        click(&mut d, 9, true);

        let carets: Vec<usize> = d
            .selections()
            .resolved(d.view())
            .iter()
            .map(|s| s.caret)
            .collect();
        assert_eq!(carets, vec![2, 6, 9]);
    }

    #[test]
    fn test_plain_click_discards() {
        let mut d = dispatcher();
        click(&mut d, 1, true);
        assert!(!d.selections().is_empty());

        click(&mut d, 4, false);
        assert!(d.selections().is_empty());
    }

    #[test]
    fn test_click_with_native_selection_is_ignored() {
        let mut d = dispatcher();
        d.view_mut().select(0..5, false);
        before_click(&mut d, true);
        after_click(&mut d, true);
        assert!(d.selections().is_empty());
    }
}

//! Command dispatch and multi-selection replay.
//!
//! [`Dispatcher`] sits between the host's command pipeline and the host's
//! single-selection execution primitive. With an empty [`SelectionSet`]
//! commands pass straight through (apart from clipboard ring handling).
//! With active selections every command is classified by
//! [`Command::kind`] and either forwarded once, replayed per selection, or
//! used to leave multi-select mode.
//!
//! Replay is a fold over the selection items: each step positions the
//! host's native caret/selection from one [`Selection`], executes the
//! command, and captures the result into a new `Selection`. Tracking points
//! absorb offset drift caused by earlier steps.

use std::collections::HashSet;

use crate::clipboard::Clipboard;
use crate::command::{Command, CommandKind, ExtendDirection, Navigation};
use crate::config::{MultiCaretConfig, DEFAULT_TRANSACTION_NAME};
use crate::host::{CommandStatus, Renderer, TextView, UndoContext};
use crate::selection_set::{Selection, SelectionSet, TrackedSpan};

/// Routes host commands across every active selection.
#[derive(Debug)]
pub struct Dispatcher<V, C, U, R> {
    view: V,
    clipboard: C,
    undo: U,
    renderer: R,
    selections: SelectionSet,
    transaction_name: String,
    /// Denied in addition to [`CommandKind::Rejected`]
    denied: HashSet<Command>,
}

/// What a generic replay pass does beyond forwarding the command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayMode {
    Plain,
    /// Re-capture ranges from the host after each step
    Extend,
    /// Demote every selection once the pass is done
    Collapse,
}

impl<V, C, U, R> Dispatcher<V, C, U, R>
where
    V: TextView,
    C: Clipboard,
    U: UndoContext,
    R: Renderer,
{
    pub fn new(view: V, clipboard: C, undo: U, renderer: R) -> Self {
        Self {
            view,
            clipboard,
            undo,
            renderer,
            selections: SelectionSet::new(),
            transaction_name: DEFAULT_TRANSACTION_NAME.to_string(),
            denied: HashSet::new(),
        }
    }

    /// Apply the transaction name and extra denylist entries from `config`
    pub fn with_config(mut self, config: &MultiCaretConfig) -> Self {
        self.transaction_name = config.transaction_name.clone();
        self.denied = config.denylist().into_iter().collect();
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub fn undo_context(&self) -> &U {
        &self.undo
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn selections_mut(&mut self) -> &mut SelectionSet {
        &mut self.selections
    }

    pub fn transaction_name(&self) -> &str {
        &self.transaction_name
    }

    /// Add the host's current caret as a new selection
    pub fn add_current_caret(&mut self) {
        self.selections.add_current_caret(&self.view);
    }

    /// Drop selections that resolve to the same caret and range
    pub fn remove_duplicates(&mut self) {
        self.selections.remove_duplicates(&self.view);
    }

    /// Leave multi-select mode
    pub fn discard_selections(&mut self) {
        self.selections.discard_selections();
    }

    /// Send the current selections to the renderer
    pub fn redraw(&mut self) {
        let resolved = self.selections.resolved(&self.view);
        self.renderer.redraw(&resolved);
    }

    /// Built-in classification, with configured denylist entries rejected
    fn classify(&self, command: &Command) -> CommandKind {
        if self.denied.contains(command) {
            CommandKind::Rejected
        } else {
            command.kind()
        }
    }

    /// Route one command. Never fails; the host's status is returned.
    pub fn dispatch(&mut self, command: &Command) -> CommandStatus {
        let kind = self.classify(command);
        tracing::debug!(
            target: "dispatch",
            %command,
            ?kind,
            selections = self.selections.len(),
            "dispatch"
        );

        let status = match kind {
            CommandKind::Rejected => {
                tracing::debug!(target: "dispatch", %command, "denylisted command rejected");
                return CommandStatus::NotSupported;
            }
            _ if self.selections.is_empty() => return self.dispatch_single(command, kind),
            CommandKind::CopyCut => self.copy_cut(command),
            CommandKind::Paste if self.selections.all_copied() => self.paste_copied(command),
            CommandKind::Paste | CommandKind::Generic => self.replay(command, ReplayMode::Plain),
            CommandKind::History => {
                let status = self.view.exec(command);
                self.selections.set_reversing(false);
                self.redraw();
                status
            }
            CommandKind::Navigate(Navigation::Collapse) => {
                self.selections.set_reversing(false);
                self.replay(command, ReplayMode::Collapse)
            }
            CommandKind::Navigate(Navigation::Cancel) => {
                self.selections.discard_selections();
                self.view.clear_selection();
                self.redraw();
                CommandStatus::Handled
            }
            CommandKind::Navigate(Navigation::Exit) => {
                self.selections.discard_selections();
                let status = self.view.exec(command);
                self.view.clear_selection();
                self.redraw();
                status
            }
            CommandKind::Extend(direction) => {
                let reversing = self.extend_reversing(direction);
                self.selections.set_reversing(reversing);
                self.replay(command, ReplayMode::Extend)
            }
        };

        tracing::debug!(
            target: "dispatch",
            %command,
            ?status,
            selections = self.selections.len(),
            reversing = self.selections.is_reversing(),
            "dispatched"
        );
        status
    }

    /// Direction for an extend gesture, decided from the current set
    fn extend_reversing(&self, direction: ExtendDirection) -> bool {
        let no_ranges = self.selections.is_caret_only();
        let reversing = self.selections.is_reversing();
        let last_reversed = self
            .selections
            .last()
            .is_some_and(|s| s.is_reversed(&self.view));

        match direction {
            ExtendDirection::Backward => no_ranges || reversing || last_reversed,
            ExtendDirection::Forward => !(no_ranges || !reversing || !last_reversed),
        }
    }

    /// Run `f` inside an undo transaction, opening one only if none is open.
    fn in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let opened = !self.undo.is_open();
        if opened {
            self.undo.open(&self.transaction_name);
        }
        let result = f(self);
        if opened {
            self.undo.close();
        }
        result
    }

    /// Fold `step` over every selection, keeping the last reported status.
    fn fold_selections<F>(&mut self, mut step: F) -> Option<CommandStatus>
    where
        F: FnMut(&mut V, &mut C, Selection) -> (Selection, Option<CommandStatus>),
    {
        let items = self.selections.take_items();
        let count = items.len();
        let view = &mut self.view;
        let clipboard = &mut self.clipboard;

        let (items, status) = items.into_iter().enumerate().fold(
            (Vec::with_capacity(count), None),
            |(mut done, last), (index, selection)| {
                let (selection, status) = step(&mut *view, &mut *clipboard, selection);
                tracing::trace!(target: "dispatch", index, ?status, "replayed selection");
                done.push(selection);
                (done, status.or(last))
            },
        );

        self.selections.restore_items(items);
        status
    }

    /// Common tail of every fan-out: reset native state, dedup, redraw
    fn finish_pass(&mut self) {
        self.view.clear_selection();
        self.selections.remove_duplicates(&self.view);
        self.rebase();
        self.redraw();
    }

    /// Re-track the selections and let the host drop history behind them
    fn rebase(&mut self) {
        self.selections.rebase(&self.view);
        if let Some(horizon) = self.selections.oldest_version() {
            self.view.release_before(horizon);
        }
    }

    // =========================================================================
    // Multi-selection categories
    // =========================================================================

    fn replay(&mut self, command: &Command, mode: ReplayMode) -> CommandStatus {
        let reversing = self.selections.is_reversing();
        let extending = mode == ReplayMode::Extend;

        let status = self.in_transaction(|this| {
            this.fold_selections(|view, _, selection| {
                replay_step(view, command, reversing, extending, selection)
            })
        });

        self.view.clear_selection();
        if mode == ReplayMode::Collapse {
            self.selections.collapse_all();
        }
        self.selections.remove_duplicates(&self.view);
        if extending {
            self.selections.refresh_search_text(&self.view);
        }
        self.rebase();
        self.redraw();

        status.unwrap_or(CommandStatus::Handled)
    }

    fn copy_cut(&mut self, command: &Command) -> CommandStatus {
        self.selections.clear_copied_text();

        let status = self.in_transaction(|this| {
            this.fold_selections(|view, clipboard, selection| {
                copy_step(view, clipboard, command, selection)
            })
        });

        let ring: Vec<String> = self
            .selections
            .iter()
            .map(|s| s.copied_text())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect();
        tracing::debug!(target: "dispatch", entries = ring.len(), "saved clipboard ring");
        self.selections.save_clipboard(ring);

        self.finish_pass();
        status.unwrap_or(CommandStatus::Handled)
    }

    fn paste_copied(&mut self, command: &Command) -> CommandStatus {
        let status = self.in_transaction(|this| {
            this.fold_selections(|view, clipboard, selection| {
                paste_step(view, clipboard, command, selection)
            })
        });

        self.finish_pass();
        status.unwrap_or(CommandStatus::Handled)
    }

    // =========================================================================
    // Single-cursor path
    // =========================================================================

    fn dispatch_single(&mut self, command: &Command, kind: CommandKind) -> CommandStatus {
        match kind {
            CommandKind::Paste if !self.selections.clipboard_ring().is_empty() => {
                self.paste_ring(command)
            }
            CommandKind::CopyCut => {
                if !self.selections.clipboard_ring().is_empty() {
                    tracing::debug!(target: "dispatch", "single copy/cut clears clipboard ring");
                }
                self.selections.clear_saved_clipboard();
                self.view.exec(command)
            }
            _ => self.view.exec(command),
        }
    }

    /// Paste every ring entry on its own line, or fall back to one paste.
    fn paste_ring(&mut self, command: &Command) -> CommandStatus {
        let live = self.clipboard.get_text();
        let ring_matches =
            live.as_deref() == self.selections.clipboard_ring().last().map(String::as_str);

        if !ring_matches {
            tracing::debug!(target: "dispatch", "clipboard changed, clearing clipboard ring");
            self.selections.clear_saved_clipboard();
            return self.view.exec(command);
        }

        if self.selections.clipboard_ring().len() < 2 {
            return self.view.exec(command);
        }

        let ring = self.selections.clipboard_ring().to_vec();
        tracing::debug!(target: "dispatch", entries = ring.len(), "pasting clipboard ring");

        self.in_transaction(|this| {
            let mut status = CommandStatus::Handled;
            for (index, text) in ring.iter().enumerate() {
                if index > 0 {
                    this.view.insert_newline();
                }
                this.clipboard.set_text(text);
                status = this.view.exec(command);
            }
            status
        })
    }
}

// =============================================================================
// Replay steps
// =============================================================================

/// Put the host's native selection/caret where `selection` is.
fn position<V: TextView>(view: &mut V, selection: &Selection, reversed: bool) {
    match selection.span().map(|span| span.resolve(&*view)) {
        Some(range) => view.select(range, reversed),
        None => view.clear_selection(),
    }
    let caret = view.resolve(selection.caret());
    view.move_caret(caret);
}

/// Take the caret back from the host; demote if the host has no selection.
fn capture<V: TextView>(view: &V, selection: Selection) -> Selection {
    let selection = selection.with_caret(view.track(view.caret()));
    match view.selection() {
        Some(_) => selection,
        None => selection.collapsed(),
    }
}

fn replay_step<V: TextView>(
    view: &mut V,
    command: &Command,
    reversing: bool,
    extending: bool,
    selection: Selection,
) -> (Selection, Option<CommandStatus>) {
    position(view, &selection, reversing);
    let status = view.exec(command);
    let selection = capture(view, selection);

    let selection = match view.selection() {
        Some(native) if extending => {
            let span = TrackedSpan::new(view.track(native.start()), view.track(native.end()));
            view.clear_selection();
            selection.with_range(span)
        }
        _ => selection,
    };
    (selection, Some(status))
}

fn copy_step<V: TextView, C: Clipboard>(
    view: &mut V,
    clipboard: &mut C,
    command: &Command,
    selection: Selection,
) -> (Selection, Option<CommandStatus>) {
    let Some(range) = selection.span().map(|span| span.resolve(&*view)) else {
        return (selection, None);
    };

    view.select(range, false);
    let status = view.exec(command);
    let copied = clipboard.get_text().unwrap_or_default();
    let selection = capture(view, selection).with_copied_text(copied);
    (selection, Some(status))
}

fn paste_step<V: TextView, C: Clipboard>(
    view: &mut V,
    clipboard: &mut C,
    command: &Command,
    selection: Selection,
) -> (Selection, Option<CommandStatus>) {
    position(view, &selection, false);
    clipboard.set_text(selection.copied_text());
    let status = view.exec(command);
    (capture(view, selection), Some(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::editable::{EditableView, UndoJournal};
    use crate::host::NoopRenderer;
    use crate::selection_set::ResolvedSelection;

    type TestDispatcher = Dispatcher<EditableView, MemoryClipboard, UndoJournal, NoopRenderer>;

    fn dispatcher(text: &str, carets: &[usize]) -> TestDispatcher {
        let clipboard = MemoryClipboard::new();
        let journal = UndoJournal::new();
        let view = EditableView::with_collaborators(text, clipboard.clone(), journal.clone());
        let mut d = Dispatcher::new(view, clipboard, journal, NoopRenderer);
        for &caret in carets {
            d.view_mut().set_caret(caret);
            d.add_current_caret();
        }
        d
    }

    fn carets(d: &TestDispatcher) -> Vec<usize> {
        d.selections()
            .resolved(d.view())
            .iter()
            .map(|r| r.caret)
            .collect()
    }

    #[test]
    fn test_empty_set_passes_through() {
        let mut d = dispatcher("abc", &[]);
        d.view_mut().set_caret(1);
        assert_eq!(d.dispatch(&Command::InsertChar('x')), CommandStatus::Handled);
        assert_eq!(d.view().text(), "axbc");
        assert!(d.selections().is_empty());
        assert_eq!(d.undo_context().transactions_opened(), 0);
    }

    #[test]
    fn test_typing_at_two_carets() {
        let text = "0123456789012345678901234";
        let mut d = dispatcher(text, &[5, 20]);

        d.dispatch(&Command::InsertChar('X'));

        assert_eq!(d.view().text(), "01234X567890123456789X01234");
        assert_eq!(carets(&d), vec![6, 22]);
        assert_eq!(d.undo_context().transactions_opened(), 1);
        assert_eq!(d.undo_context().transactions_closed(), 1);
        assert_eq!(d.undo_context().undo_count(), 1);
    }

    #[test]
    fn test_denylisted_command_untouched() {
        let mut d = dispatcher("abc", &[0, 2]);
        let before = d.selections().resolved(d.view());
        assert_eq!(
            d.dispatch(&Command::SelectSolutionPlatform),
            CommandStatus::NotSupported
        );
        assert_eq!(d.selections().resolved(d.view()), before);
        assert_eq!(d.undo_context().transactions_opened(), 0);
    }

    #[test]
    fn test_configured_denylist() {
        let config = MultiCaretConfig {
            denied_commands: vec!["InsertTab".to_string()],
            ..MultiCaretConfig::default()
        };
        let mut d = dispatcher("abc", &[]).with_config(&config);
        assert_eq!(d.dispatch(&Command::InsertTab), CommandStatus::NotSupported);
        assert_eq!(d.view().text(), "abc");
    }

    #[test]
    fn test_configured_entry_classified_as_rejected() {
        let config = MultiCaretConfig {
            denied_commands: vec!["Paste".to_string()],
            ..MultiCaretConfig::default()
        };
        let d = dispatcher("abc", &[0, 1]).with_config(&config);

        assert_eq!(d.classify(&Command::Paste), CommandKind::Rejected);
        assert_eq!(d.classify(&Command::SelectSolutionPlatform), CommandKind::Rejected);
        assert_eq!(d.classify(&Command::Copy), CommandKind::CopyCut);
    }

    #[test]
    fn test_rejected_in_multi_mode_leaves_host_untouched() {
        let config = MultiCaretConfig {
            denied_commands: vec!["Paste".to_string()],
            ..MultiCaretConfig::default()
        };
        let mut d = dispatcher("abc", &[0, 1]).with_config(&config);
        d.clipboard_mut().set_text("zz");

        assert_eq!(d.dispatch(&Command::Paste), CommandStatus::NotSupported);
        assert_eq!(d.view().text(), "abc");
        assert_eq!(d.selections().len(), 2);
        assert_eq!(d.undo_context().transactions_opened(), 0);
    }

    #[test]
    fn test_exit_clears_native_selection() {
        let mut d = dispatcher("abc def", &[1, 5]);
        d.view_mut().set_caret(2);

        let status = d.dispatch(&Command::MoveCursorDocumentStartWithSelection);

        assert_eq!(status, CommandStatus::Handled);
        assert!(d.selections().is_empty());
        assert_eq!(d.view().selection(), None);
        assert_eq!(d.view().caret(), 0);
    }

    #[test]
    fn test_extend_backward_from_carets() {
        let mut d = dispatcher("hello world", &[5, 11]);
        d.dispatch(&Command::MoveCursorWordLeftWithSelection);

        assert!(d.selections().is_reversing());
        assert_eq!(
            d.selections().resolved(d.view()),
            vec![
                ResolvedSelection { caret: 0, range: Some(0..5) },
                ResolvedSelection { caret: 6, range: Some(6..11) },
            ]
        );
        assert_eq!(d.selections().search_text(), "world");
        assert_eq!(d.view().selection(), None);
    }

    #[test]
    fn test_extend_forward_from_carets() {
        let mut d = dispatcher("ab cd", &[0, 3]);
        d.dispatch(&Command::MoveCursorRightWithSelection);
        assert!(!d.selections().is_reversing());
        assert_eq!(
            d.selections().resolved(d.view()),
            vec![
                ResolvedSelection { caret: 1, range: Some(0..1) },
                ResolvedSelection { caret: 4, range: Some(3..4) },
            ]
        );
    }

    #[test]
    fn test_plain_motion_collapses() {
        let mut d = dispatcher("ab cd", &[0, 3]);
        d.dispatch(&Command::MoveCursorRightWithSelection);
        d.dispatch(&Command::MoveCursorRightWithSelection);
        d.dispatch(&Command::MoveCursorRight);

        assert!(d.selections().is_caret_only());
        assert_eq!(carets(&d), vec![2, 5]);
    }

    #[test]
    fn test_motion_merges_duplicates() {
        let mut d = dispatcher("abc", &[0, 1]);
        d.dispatch(&Command::MoveCursorLeft);
        assert_eq!(carets(&d), vec![0]);
    }
}

//! Edit history (undo/redo) with transaction grouping for the reference host.
//!
//! [`UndoJournal`] is a shared handle: the view records edits into it while
//! the dispatcher opens and closes transactions on a clone of the same
//! journal through [`UndoContext`]. Edits recorded while a transaction is
//! open become one undo step.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::UndoContext;

/// A single edit operation that can be undone/redone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Char offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted_text: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted_text: String,
    /// Caret offset before the edit
    pub caret_before: usize,
    /// Caret offset after the edit
    pub caret_after: usize,
}

impl EditOperation {
    /// Create an insert operation
    pub fn insert(offset: usize, text: String, caret_before: usize, caret_after: usize) -> Self {
        Self {
            offset,
            deleted_text: String::new(),
            inserted_text: text,
            caret_before,
            caret_after,
        }
    }

    /// Create a delete operation
    pub fn delete(offset: usize, text: String, caret_before: usize, caret_after: usize) -> Self {
        Self {
            offset,
            deleted_text: text,
            inserted_text: String::new(),
            caret_before,
            caret_after,
        }
    }

    /// Create a replace operation
    pub fn replace(
        offset: usize,
        deleted_text: String,
        inserted_text: String,
        caret_before: usize,
        caret_after: usize,
    ) -> Self {
        Self {
            offset,
            deleted_text,
            inserted_text,
            caret_before,
            caret_after,
        }
    }
}

/// Operations that undo and redo together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoGroup {
    /// Transaction name, `None` for a lone edit
    pub name: Option<String>,
    pub operations: Vec<EditOperation>,
}

impl UndoGroup {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[derive(Debug, Default)]
struct JournalState {
    undo_stack: Vec<UndoGroup>,
    redo_stack: Vec<UndoGroup>,
    open: Option<UndoGroup>,
    max_size: usize,
    transactions_opened: usize,
    transactions_closed: usize,
}

/// Shared edit history with undo/redo stacks and transactions.
#[derive(Debug, Clone)]
pub struct UndoJournal {
    state: Rc<RefCell<JournalState>>,
}

impl Default for UndoJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoJournal {
    /// Create a new journal with default max size
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    /// Create a new journal keeping at most `max_size` undo steps
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(JournalState {
                max_size,
                ..JournalState::default()
            })),
        }
    }

    /// Record an edit (clears the redo stack)
    pub fn push(&self, op: EditOperation) {
        let mut state = self.state.borrow_mut();
        state.redo_stack.clear();

        if let Some(group) = state.open.as_mut() {
            group.operations.push(op);
            return;
        }

        state.undo_stack.push(UndoGroup {
            name: None,
            operations: vec![op],
        });
        Self::trim(&mut state);
    }

    fn trim(state: &mut JournalState) {
        while state.undo_stack.len() > state.max_size {
            state.undo_stack.remove(0);
        }
    }

    /// Pop the latest undo step (moves it to the redo stack)
    pub fn pop_undo(&self) -> Option<UndoGroup> {
        let mut state = self.state.borrow_mut();
        let group = state.undo_stack.pop()?;
        state.redo_stack.push(group.clone());
        Some(group)
    }

    /// Pop the latest redo step (moves it back to the undo stack)
    pub fn pop_redo(&self) -> Option<UndoGroup> {
        let mut state = self.state.borrow_mut();
        let group = state.redo_stack.pop()?;
        state.undo_stack.push(group.clone());
        Some(group)
    }

    pub fn can_undo(&self) -> bool {
        !self.state.borrow().undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.state.borrow().redo_stack.is_empty()
    }

    /// Number of undo steps
    pub fn undo_count(&self) -> usize {
        self.state.borrow().undo_stack.len()
    }

    /// Latest undo step, if any
    pub fn last_group(&self) -> Option<UndoGroup> {
        self.state.borrow().undo_stack.last().cloned()
    }

    /// How many transactions have been opened over the journal's lifetime
    pub fn transactions_opened(&self) -> usize {
        self.state.borrow().transactions_opened
    }

    /// How many transactions have been closed over the journal's lifetime
    pub fn transactions_closed(&self) -> usize {
        self.state.borrow().transactions_closed
    }
}

impl UndoContext for UndoJournal {
    fn is_open(&self) -> bool {
        self.state.borrow().open.is_some()
    }

    fn open(&mut self, name: &str) {
        let mut state = self.state.borrow_mut();
        if state.open.is_some() {
            tracing::debug!("Undo transaction already open, ignoring open({})", name);
            return;
        }
        state.open = Some(UndoGroup {
            name: Some(name.to_string()),
            operations: Vec::new(),
        });
        state.transactions_opened += 1;
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        let Some(group) = state.open.take() else {
            return;
        };
        state.transactions_closed += 1;
        if !group.is_empty() {
            state.undo_stack.push(group);
            Self::trim(&mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(offset: usize, text: &str) -> EditOperation {
        let len = text.chars().count();
        EditOperation::insert(offset, text.to_string(), offset, offset + len)
    }

    #[test]
    fn test_lone_edits_are_separate_steps() {
        let journal = UndoJournal::new();
        journal.push(insert(0, "a"));
        journal.push(insert(1, "b"));
        assert_eq!(journal.undo_count(), 2);
    }

    #[test]
    fn test_transaction_groups_edits() {
        let mut journal = UndoJournal::new();
        journal.open("multi");
        journal.push(insert(0, "a"));
        journal.push(insert(5, "b"));
        assert!(journal.is_open());
        assert_eq!(journal.undo_count(), 0);

        journal.close();
        assert!(!journal.is_open());
        assert_eq!(journal.undo_count(), 1);

        let group = journal.last_group().unwrap();
        assert_eq!(group.name.as_deref(), Some("multi"));
        assert_eq!(group.operations.len(), 2);
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut journal = UndoJournal::new();
        journal.open("one");
        journal.open("two");
        assert_eq!(journal.transactions_opened(), 1);
        journal.close();
        journal.close();
        assert_eq!(journal.transactions_closed(), 1);
    }

    #[test]
    fn test_empty_transaction_adds_no_step() {
        let mut journal = UndoJournal::new();
        journal.open("nothing");
        journal.close();
        assert_eq!(journal.undo_count(), 0);
    }

    #[test]
    fn test_undo_redo_moves_groups() {
        let journal = UndoJournal::new();
        journal.push(insert(0, "a"));

        let undone = journal.pop_undo().unwrap();
        assert_eq!(undone.operations[0].inserted_text, "a");
        assert!(journal.can_redo());
        assert!(!journal.can_undo());

        let redone = journal.pop_redo().unwrap();
        assert_eq!(redone, undone);
        assert!(journal.can_undo());
    }

    #[test]
    fn test_push_clears_redo() {
        let journal = UndoJournal::new();
        journal.push(insert(0, "a"));
        journal.pop_undo();
        assert!(journal.can_redo());

        journal.push(insert(0, "b"));
        assert!(!journal.can_redo());
    }

    #[test]
    fn test_clones_share_history() {
        let journal = UndoJournal::new();
        let mut handle = journal.clone();
        handle.open("shared");
        journal.push(insert(0, "x"));
        handle.close();
        assert_eq!(journal.undo_count(), 1);
    }

    #[test]
    fn test_history_max_size() {
        let journal = UndoJournal::with_max_size(3);
        for i in 0..5 {
            journal.push(insert(i, &i.to_string()));
        }
        assert_eq!(journal.undo_count(), 3);
    }
}

//! In-memory reference host.
//!
//! A conventional single-caret editor surface the dispatcher can drive
//! without a real editor around it. Used by the tests, the benches and the
//! `multicaret` script runner.
//!
//! # Architecture
//!
//! - [`TextBuffer`] / [`TextBufferMut`]: Traits abstracting over buffer implementations
//! - [`RopeBuffer`]: Buffer for multi-line documents (backed by `ropey::Rope`)
//! - [`UndoJournal`]: Shared undo/redo history; also the [`crate::host::UndoContext`]
//! - [`EditableView`]: Caret, selection, command execution and change log
//!
//! # Example
//!
//! ```
//! use multicaret::command::Command;
//! use multicaret::editable::EditableView;
//! use multicaret::host::TextView;
//!
//! let mut view = EditableView::from_text("hello");
//! view.set_caret(5);
//! view.exec(&Command::InsertChar('!'));
//!
//! assert_eq!(view.text(), "hello!");
//! ```

mod buffer;
mod history;
mod state;

// Re-export main types
pub use buffer::{RopeBuffer, TextBuffer, TextBufferMut};
pub use history::{EditOperation, UndoGroup, UndoJournal};
pub use state::{EditableView, DEFAULT_PAGE_LINES};

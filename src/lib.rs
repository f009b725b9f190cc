//! multicaret - multi-cursor editing on top of a single-selection editor
//!
//! This crate keeps an ordered set of independent selections and replays
//! every host command across them, so a host that only understands one
//! caret and one selection behaves like a multi-cursor editor.

pub mod cli;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod config_paths;
pub mod dispatch;
pub mod editable;
pub mod host;
pub mod script;
pub mod seed;
pub mod selection_set;
pub mod tracing;
pub mod tracking;
pub mod util;

// Re-export commonly used types
pub use command::{Command, CommandKind};
pub use config::MultiCaretConfig;
pub use dispatch::Dispatcher;
pub use host::{CommandStatus, TextView};
pub use selection_set::{Selection, SelectionSet};

//! Command taxonomy and classification
//!
//! [`Command`] names every editor command the dispatcher has an opinion
//! about; anything else arrives as [`Command::Host`] and is replayed like
//! typing. [`Command::kind`] is the single place that decides how a command
//! interacts with the selection set.

use std::fmt;
use std::str::FromStr;

/// Commands routed from the host's command pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ========================================================================
    // Cursor Movement (no selection)
    // ========================================================================
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorUp,
    MoveCursorDown,
    MoveCursorWordLeft,
    MoveCursorWordRight,
    MoveCursorLineStart,
    MoveCursorLineEnd,
    MoveCursorDocumentStart,
    MoveCursorDocumentEnd,
    PageUp,
    PageDown,

    // ========================================================================
    // Selection Movement (extend selection)
    // ========================================================================
    MoveCursorLeftWithSelection,
    MoveCursorRightWithSelection,
    MoveCursorUpWithSelection,
    MoveCursorDownWithSelection,
    MoveCursorWordLeftWithSelection,
    MoveCursorWordRightWithSelection,
    MoveCursorLineStartWithSelection,
    MoveCursorLineEndWithSelection,
    MoveCursorDocumentStartWithSelection,
    MoveCursorDocumentEndWithSelection,

    /// Escape: leave multi-select mode
    Cancel,

    // ========================================================================
    // Clipboard / History
    // ========================================================================
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,

    // ========================================================================
    // Text Editing
    // ========================================================================
    /// Type a character
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,

    // ========================================================================
    // Editor chrome (never text related)
    // ========================================================================
    SelectSolutionPlatform,
    SelectSolutionConfiguration,

    /// Raw host command the taxonomy does not name
    Host { group: u32, id: u32 },
}

/// What a plain navigation command does to the selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Keep the carets, drop their ranges
    Collapse,
    /// Discard the set, then forward the command once
    Exit,
    /// Discard the set; the command is consumed
    Cancel,
}

/// Which way an extend-selection command grows the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendDirection {
    Backward,
    Forward,
}

/// How the dispatcher treats a command while selections are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Denylisted: rejected before any selection logic runs
    Rejected,
    CopyCut,
    Paste,
    /// Undo/redo: forwarded once, never fanned out
    History,
    Navigate(Navigation),
    Extend(ExtendDirection),
    /// Replayed once per selection with no special handling
    Generic,
}

impl Command {
    /// Classify this command.
    pub fn kind(&self) -> CommandKind {
        use Command::*;

        match self {
            SelectSolutionPlatform | SelectSolutionConfiguration => CommandKind::Rejected,

            Copy | Cut => CommandKind::CopyCut,
            Paste => CommandKind::Paste,
            Undo | Redo => CommandKind::History,

            MoveCursorLeft | MoveCursorRight | MoveCursorUp | MoveCursorDown
            | MoveCursorWordLeft | MoveCursorWordRight => {
                CommandKind::Navigate(Navigation::Collapse)
            }
            PageUp
            | PageDown
            | MoveCursorDocumentStart
            | MoveCursorDocumentEnd
            | MoveCursorDocumentStartWithSelection
            | MoveCursorDocumentEndWithSelection => CommandKind::Navigate(Navigation::Exit),
            Cancel => CommandKind::Navigate(Navigation::Cancel),

            MoveCursorLeftWithSelection
            | MoveCursorUpWithSelection
            | MoveCursorWordLeftWithSelection
            | MoveCursorLineStartWithSelection => CommandKind::Extend(ExtendDirection::Backward),
            MoveCursorRightWithSelection
            | MoveCursorDownWithSelection
            | MoveCursorWordRightWithSelection
            | MoveCursorLineEndWithSelection => CommandKind::Extend(ExtendDirection::Forward),

            MoveCursorLineStart | MoveCursorLineEnd | InsertChar(_) | InsertNewline
            | InsertTab | DeleteBackward | DeleteForward | Host { .. } => CommandKind::Generic,
        }
    }

    /// Name used in configuration files and scripts
    fn name(&self) -> &'static str {
        use Command::*;

        match self {
            MoveCursorLeft => "MoveCursorLeft",
            MoveCursorRight => "MoveCursorRight",
            MoveCursorUp => "MoveCursorUp",
            MoveCursorDown => "MoveCursorDown",
            MoveCursorWordLeft => "MoveCursorWordLeft",
            MoveCursorWordRight => "MoveCursorWordRight",
            MoveCursorLineStart => "MoveCursorLineStart",
            MoveCursorLineEnd => "MoveCursorLineEnd",
            MoveCursorDocumentStart => "MoveCursorDocumentStart",
            MoveCursorDocumentEnd => "MoveCursorDocumentEnd",
            PageUp => "PageUp",
            PageDown => "PageDown",
            MoveCursorLeftWithSelection => "MoveCursorLeftWithSelection",
            MoveCursorRightWithSelection => "MoveCursorRightWithSelection",
            MoveCursorUpWithSelection => "MoveCursorUpWithSelection",
            MoveCursorDownWithSelection => "MoveCursorDownWithSelection",
            MoveCursorWordLeftWithSelection => "MoveCursorWordLeftWithSelection",
            MoveCursorWordRightWithSelection => "MoveCursorWordRightWithSelection",
            MoveCursorLineStartWithSelection => "MoveCursorLineStartWithSelection",
            MoveCursorLineEndWithSelection => "MoveCursorLineEndWithSelection",
            MoveCursorDocumentStartWithSelection => "MoveCursorDocumentStartWithSelection",
            MoveCursorDocumentEndWithSelection => "MoveCursorDocumentEndWithSelection",
            Cancel => "Cancel",
            Copy => "Copy",
            Cut => "Cut",
            Paste => "Paste",
            Undo => "Undo",
            Redo => "Redo",
            InsertChar(_) => "InsertChar",
            InsertNewline => "InsertNewline",
            InsertTab => "InsertTab",
            DeleteBackward => "DeleteBackward",
            DeleteForward => "DeleteForward",
            SelectSolutionPlatform => "SelectSolutionPlatform",
            SelectSolutionConfiguration => "SelectSolutionConfiguration",
            Host { .. } => "Host",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::InsertChar(ch) => write!(f, "InsertChar:{}", ch),
            Command::Host { group, id } => write!(f, "Host:{}:{}", group, id),
            other => f.write_str(other.name()),
        }
    }
}

/// A command string that does not name a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(pub String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid command: {}", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Leading whitespace only: "InsertChar: " types a space
        let s = s.trim_start();
        if let Some(rest) = s.strip_prefix("InsertChar:") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(Command::InsertChar(ch)),
                _ => Err(ParseCommandError(s.to_string())),
            };
        }

        let s = s.trim_end();
        let invalid = || ParseCommandError(s.to_string());

        if let Some(rest) = s.strip_prefix("Host:") {
            let (group, id) = rest.split_once(':').ok_or_else(invalid)?;
            let group = group.parse().map_err(|_| invalid())?;
            let id = id.parse().map_err(|_| invalid())?;
            return Ok(Command::Host { group, id });
        }

        use Command::*;
        let command = match s {
            "MoveCursorLeft" => MoveCursorLeft,
            "MoveCursorRight" => MoveCursorRight,
            "MoveCursorUp" => MoveCursorUp,
            "MoveCursorDown" => MoveCursorDown,
            "MoveCursorWordLeft" => MoveCursorWordLeft,
            "MoveCursorWordRight" => MoveCursorWordRight,
            "MoveCursorLineStart" => MoveCursorLineStart,
            "MoveCursorLineEnd" => MoveCursorLineEnd,
            "MoveCursorDocumentStart" => MoveCursorDocumentStart,
            "MoveCursorDocumentEnd" => MoveCursorDocumentEnd,
            "PageUp" => PageUp,
            "PageDown" => PageDown,
            "MoveCursorLeftWithSelection" => MoveCursorLeftWithSelection,
            "MoveCursorRightWithSelection" => MoveCursorRightWithSelection,
            "MoveCursorUpWithSelection" => MoveCursorUpWithSelection,
            "MoveCursorDownWithSelection" => MoveCursorDownWithSelection,
            "MoveCursorWordLeftWithSelection" => MoveCursorWordLeftWithSelection,
            "MoveCursorWordRightWithSelection" => MoveCursorWordRightWithSelection,
            "MoveCursorLineStartWithSelection" => MoveCursorLineStartWithSelection,
            "MoveCursorLineEndWithSelection" => MoveCursorLineEndWithSelection,
            "MoveCursorDocumentStartWithSelection" => MoveCursorDocumentStartWithSelection,
            "MoveCursorDocumentEndWithSelection" => MoveCursorDocumentEndWithSelection,
            "Cancel" => Cancel,
            "Copy" => Copy,
            "Cut" => Cut,
            "Paste" => Paste,
            "Undo" => Undo,
            "Redo" => Redo,
            "InsertNewline" => InsertNewline,
            "InsertTab" => InsertTab,
            "DeleteBackward" => DeleteBackward,
            "DeleteForward" => DeleteForward,
            "SelectSolutionPlatform" => SelectSolutionPlatform,
            "SelectSolutionConfiguration" => SelectSolutionConfiguration,
            _ => return Err(invalid()),
        };
        Ok(command)
    }
}

//! Scripted replay of command sequences against the reference host.
//!
//! A script is YAML:
//!
//! ```yaml
//! text: "alpha\nbeta\n"
//! carets: [0, 6]           # one selection per caret
//! ranges: [[0, 5], ~]      # optional, parallel to carets
//! clipboard: "seed"        # optional initial clipboard text
//! commands:
//!   - MoveCursorWordRightWithSelection
//!   - Copy
//!   - InsertChar:x
//! ```
//!
//! With no carets the dispatcher runs in single-cursor mode with the native
//! caret at `caret` (default 0).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::command::{Command, ParseCommandError};
use crate::config::MultiCaretConfig;
use crate::dispatch::Dispatcher;
use crate::editable::{EditableView, UndoJournal};
use crate::host::{CommandStatus, TextView};
use crate::selection_set::{ResolvedSelection, Selection};
use crate::tracing::TracingRenderer;

/// Error loading or running a script
#[derive(Debug)]
pub enum ScriptError {
    Io(PathBuf, std::io::Error),
    Parse(serde_yaml::Error),
    /// A command string at `index` could not be parsed
    Command {
        index: usize,
        source: ParseCommandError,
    },
    /// A caret or range offset lies past the end of the text
    OffsetOutOfRange { offset: usize, len: usize },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(path, e) => write!(f, "Failed to read {}: {}", path.display(), e),
            ScriptError::Parse(e) => write!(f, "Invalid script: {}", e),
            ScriptError::Command { index, source } => {
                write!(f, "Command #{}: {}", index + 1, source)
            }
            ScriptError::OffsetOutOfRange { offset, len } => {
                write!(f, "Offset {} is past the end of the text ({} chars)", offset, len)
            }
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io(_, e) => Some(e),
            ScriptError::Parse(e) => Some(e),
            ScriptError::Command { source, .. } => Some(source),
            ScriptError::OffsetOutOfRange { .. } => None,
        }
    }
}

/// A replay script
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub text: String,

    /// Native caret when no selections are seeded
    #[serde(default)]
    pub caret: usize,

    #[serde(default)]
    pub carets: Vec<usize>,

    /// `[start, end]` per caret, `~` for caret-only
    #[serde(default)]
    pub ranges: Vec<Option<[usize; 2]>>,

    #[serde(default)]
    pub clipboard: Option<String>,

    #[serde(default)]
    pub commands: Vec<String>,
}

/// Status of one replayed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub command: String,
    pub status: CommandStatus,
}

/// Final state after a script ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptOutcome {
    pub text: String,
    pub caret: usize,
    pub selections: Vec<ResolvedSelection>,
    pub search_text: String,
    pub clipboard_ring: Vec<String>,
    pub undo_steps: usize,
    pub steps: Vec<StepResult>,
}

impl Script {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        serde_yaml::from_str(yaml).map_err(ScriptError::Parse)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScriptError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&content)
    }

    /// Parse every command up front so a typo fails before anything runs
    pub fn parsed_commands(&self) -> Result<Vec<Command>, ScriptError> {
        self.commands
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.parse::<Command>()
                    .map_err(|source| ScriptError::Command { index, source })
            })
            .collect()
    }

    /// Run against an in-memory clipboard
    pub fn run(&self, config: &MultiCaretConfig) -> Result<ScriptOutcome, ScriptError> {
        let shared = MemoryClipboard::new();
        self.run_with(config, || shared.clone())
    }

    /// Run with clipboards from `clipboard`; the host and the dispatcher each
    /// get one and both must see the same contents.
    pub fn run_with<C, F>(
        &self,
        config: &MultiCaretConfig,
        mut clipboard: F,
    ) -> Result<ScriptOutcome, ScriptError>
    where
        C: Clipboard,
        F: FnMut() -> C,
    {
        let commands = self.parsed_commands()?;
        let len = self.text.chars().count();
        let check = |offset: usize| {
            if offset > len {
                Err(ScriptError::OffsetOutOfRange { offset, len })
            } else {
                Ok(offset)
            }
        };

        let journal = UndoJournal::new();
        let view = EditableView::with_collaborators(&self.text, clipboard(), journal.clone())
            .with_page_lines(config.page_lines);
        let mut dispatcher =
            Dispatcher::new(view, clipboard(), journal.clone(), TracingRenderer::new())
                .with_config(config);

        if let Some(text) = &self.clipboard {
            dispatcher.clipboard_mut().set_text(text);
        }

        dispatcher.view_mut().set_caret(check(self.caret)?);
        for (i, &caret) in self.carets.iter().enumerate() {
            let range = match self.ranges.get(i).copied().flatten() {
                Some([start, end]) => Some(check(start)?..check(end)?),
                None => None,
            };
            let selection = Selection::at(dispatcher.view(), check(caret)?, range);
            dispatcher.selections_mut().push(selection);
        }
        dispatcher.remove_duplicates();

        tracing::info!(
            selections = dispatcher.selections().len(),
            commands = commands.len(),
            "running script"
        );

        let steps: Vec<StepResult> = commands
            .iter()
            .map(|command| StepResult {
                command: command.to_string(),
                status: dispatcher.dispatch(command),
            })
            .collect();

        Ok(ScriptOutcome {
            text: dispatcher.view().text(),
            caret: dispatcher.view().caret(),
            selections: dispatcher.selections().resolved(dispatcher.view()),
            search_text: dispatcher.selections().search_text().to_string(),
            clipboard_ring: dispatcher.selections().clipboard_ring().to_vec(),
            undo_steps: journal.undo_count(),
            steps,
        })
    }
}

impl ScriptOutcome {
    /// Human-readable summary
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.text);
        if !self.text.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("---\n");
        out.push_str(&format!("caret: {}\n", self.caret));
        for (i, selection) in self.selections.iter().enumerate() {
            match &selection.range {
                Some(range) => out.push_str(&format!(
                    "selection #{}: caret {} range {}..{}\n",
                    i, selection.caret, range.start, range.end
                )),
                None => out.push_str(&format!("selection #{}: caret {}\n", i, selection.caret)),
            }
        }
        if !self.search_text.is_empty() {
            out.push_str(&format!("search text: {:?}\n", self.search_text));
        }
        if !self.clipboard_ring.is_empty() {
            out.push_str(&format!("clipboard ring: {:?}\n", self.clipboard_ring));
        }
        out.push_str(&format!("undo steps: {}\n", self.undo_steps));
        for step in &self.steps {
            if !step.status.is_handled() {
                out.push_str(&format!("{}: {:?}\n", step.command, step.status));
            }
        }
        out
    }
}

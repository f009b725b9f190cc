//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! selection replay and dispatch decisions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=dispatch=trace,selection=debug` - scoped filtering
//! - `RUST_LOG=multicaret::dispatch=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/multicaret/logs/multicaret.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::host::Renderer;
use crate::selection_set::ResolvedSelection;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering (default `warn`).
/// File logging writes to `~/.config/multicaret/logs/multicaret.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG; stderr keeps stdout for script output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the selection set for diffing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub selections: Vec<ResolvedSelection>,
}

impl SelectionSnapshot {
    pub fn new(selections: &[ResolvedSelection]) -> Self {
        Self {
            selections: selections.to_vec(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        if self.selections.len() != other.selections.len() {
            return Some(format!(
                "selection count: {} → {}",
                self.selections.len(),
                other.selections.len()
            ));
        }

        let mut changes = Vec::new();
        for (i, (before, after)) in self.selections.iter().zip(&other.selections).enumerate() {
            if before.caret != after.caret {
                changes.push(format!("#{}: {} → {}", i, before.caret, after.caret));
            }
            match (&before.range, &after.range) {
                (Some(_), None) => changes.push(format!("#{}: range cleared", i)),
                (None, Some(r)) => changes.push(format!("#{}: range {}..{}", i, r.start, r.end)),
                (Some(a), Some(b)) if a != b => changes.push(format!(
                    "#{}: range {}..{} → {}..{}",
                    i, a.start, a.end, b.start, b.end
                )),
                _ => {}
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

/// Renderer that logs what changed since the previous redraw
#[derive(Debug, Clone, Default)]
pub struct TracingRenderer {
    last: SelectionSnapshot,
    redraws: usize,
}

impl TracingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selections passed to the latest redraw
    pub fn last(&self) -> &[ResolvedSelection] {
        &self.last.selections
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

impl Renderer for TracingRenderer {
    fn redraw(&mut self, selections: &[ResolvedSelection]) {
        let snapshot = SelectionSnapshot::new(selections);
        if let Some(diff) = self.last.diff(&snapshot) {
            tracing::debug!(target: "selection", "redraw: {}", diff);
        }
        self.last = snapshot;
        self.redraws += 1;
    }
}

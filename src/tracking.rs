//! Tracking positions that stay attached to the same logical character
//! while the buffer is edited underneath them.
//!
//! A [`TrackingPoint`] is a plain value: the char offset it had when it was
//! created plus the [`Version`] of the [`ChangeLog`] at that moment. Resolving
//! the point replays every [`Change`] recorded since that version over the
//! stored offset, so points never need to be visited when the buffer changes.
//!
//! The log grows with every edit and a point's resolve cost grows with the
//! number of changes since it was created. Owners that re-track their points
//! can drop the history nobody needs any more with [`ChangeLog::compact`].
//!
//! # Example
//!
//! ```
//! use multicaret::tracking::{ChangeLog, TrackingMode};
//!
//! let mut log = ChangeLog::new();
//! let point = log.track(5, TrackingMode::Positive);
//!
//! log.record(0, 0, 3); // three chars inserted before the point
//! assert_eq!(log.resolve(&point), 8);
//! ```

/// Number of changes recorded in a [`ChangeLog`] at a given moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub usize);

/// How a point behaves when text is inserted exactly at its offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrackingMode {
    /// The point moves after the inserted text.
    #[default]
    Positive,
    /// The point stays before the inserted text.
    Negative,
}

/// One buffer mutation, in chars: `removed` chars starting at `offset` were
/// replaced by `inserted` chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub offset: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl Change {
    /// Map an offset from before this change to after it.
    pub fn map(&self, position: usize, mode: TrackingMode) -> usize {
        let removed_end = self.offset + self.removed;

        if position < self.offset {
            return position;
        }
        if position > removed_end {
            return position - self.removed + self.inserted;
        }

        // Inside (or touching) the replaced span
        if position == self.offset && mode == TrackingMode::Negative {
            return self.offset;
        }
        if position == self.offset && self.removed == 0 {
            return self.offset + self.inserted;
        }
        match mode {
            TrackingMode::Positive => self.offset + self.inserted,
            TrackingMode::Negative => self.offset,
        }
    }
}

/// A position in the buffer that survives later edits.
///
/// Created through [`ChangeLog::track`] (or a host's
/// [`PointTracker::track`](crate::host::PointTracker::track)); resolved with
/// [`ChangeLog::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackingPoint {
    offset: usize,
    version: Version,
    mode: TrackingMode,
}

impl TrackingPoint {
    pub fn version(&self) -> Version {
        self.version
    }
}

/// History of buffer mutations used to resolve tracking points.
///
/// Versions keep counting across [`ChangeLog::compact`]; only the changes
/// below the compaction horizon are dropped.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Vec<Change>,
    /// Number of changes dropped by compaction
    base: usize,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version (the number of changes ever recorded)
    pub fn version(&self) -> Version {
        Version(self.base + self.changes.len())
    }

    /// Oldest version points can still be resolved from exactly
    pub fn horizon(&self) -> Version {
        Version(self.base)
    }

    /// Record a mutation. No-op changes are not recorded.
    pub fn record(&mut self, offset: usize, removed: usize, inserted: usize) {
        if removed == 0 && inserted == 0 {
            return;
        }
        self.changes.push(Change {
            offset,
            removed,
            inserted,
        });
    }

    /// Create a point at `offset` against the current version.
    pub fn track(&self, offset: usize, mode: TrackingMode) -> TrackingPoint {
        TrackingPoint {
            offset,
            version: self.version(),
            mode,
        }
    }

    /// Resolve a point to its current offset.
    ///
    /// Points created against a version newer than this log (e.g. from a
    /// different buffer) resolve to their creation offset. Points older than
    /// the horizon only see the changes that are still kept.
    pub fn resolve(&self, point: &TrackingPoint) -> usize {
        self.changes_since(point.version)
            .iter()
            .fold(point.offset, |offset, change| change.map(offset, point.mode))
    }

    fn changes_since(&self, version: Version) -> &[Change] {
        let start = version.0.saturating_sub(self.base).min(self.changes.len());
        &self.changes[start..]
    }

    /// Drop every change recorded before `horizon`.
    ///
    /// Only call this once no live point is older than `horizon`.
    pub fn compact(&mut self, horizon: Version) {
        let horizon = horizon.0.min(self.version().0);
        if horizon <= self.base {
            return;
        }
        self.changes.drain(..horizon - self.base);
        self.base = horizon;
    }

    /// Number of changes currently kept
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

//! Depth-indexed enable/detect flags.
//!
//! One [`ErrorFlag`] backs one scoped error mode (Append or Override) for a
//! single traversal. A level is enabled when a scope at that depth opts into
//! the mode; a detection at some depth reaches every enabled level at or
//! above it. Leaving a level hands back the representative error ID exactly
//! when that level was enabled and a detection reached it.
//!
//! Depth is bounded and monotonic within one traversal, so levels live in a
//! flat dense vector rather than a per-scope structure.

use crate::scheme::ErrorId;

#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    error_id: ErrorId,
    detected: bool,
}

/// Enable/detect state for one error mode, indexed by traversal depth.
#[derive(Debug, Default)]
pub struct ErrorFlag {
    levels: Vec<Option<LevelEntry>>,
    enabled_count: usize,
    detected_count: usize,
}

impl ErrorFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with room for `capacity` levels before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            levels: Vec::with_capacity(capacity),
            enabled_count: 0,
            detected_count: 0,
        }
    }

    /// Enable `level` with a representative error ID.
    ///
    /// First write wins: repeated calls at an already-enabled level keep the
    /// stored ID.
    pub fn set_enabled(&mut self, level: usize, error_id: ErrorId) {
        if level >= self.levels.len() {
            self.levels.resize(level + 1, None);
        }
        if self.levels[level].is_none() {
            self.levels[level] = Some(LevelEntry {
                error_id,
                detected: false,
            });
            self.enabled_count += 1;
        }
    }

    /// Record a detection at `level`, reaching every enabled level at or
    /// above it.
    ///
    /// The detection floor is monotone: once a level is marked it stays
    /// marked until that level is left.
    pub fn set_detected(&mut self, level: usize) {
        if self.levels.is_empty() {
            return;
        }
        let upper = level.min(self.levels.len() - 1);
        for entry in self.levels[..=upper].iter_mut().flatten() {
            if !entry.detected {
                entry.detected = true;
                self.detected_count += 1;
            }
        }
    }

    /// Leave `level`, clearing its state.
    ///
    /// Returns the representative error ID iff the level was enabled and a
    /// detection occurred at that level or deeper since enabling.
    pub fn leave_level(&mut self, level: usize) -> Option<ErrorId> {
        let entry = self.levels.get_mut(level)?.take()?;
        self.enabled_count -= 1;
        if entry.detected {
            self.detected_count -= 1;
            Some(entry.error_id)
        } else {
            None
        }
    }

    pub fn is_enabled_at_any_level(&self) -> bool {
        self.enabled_count > 0
    }

    pub fn is_detected_at_any_level(&self) -> bool {
        self.detected_count > 0
    }
}

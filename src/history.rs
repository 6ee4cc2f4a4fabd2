use std::sync::Arc;

use image::RgbaImage;

/// An immutable, fully detached copy of the surface pixels.
///
/// Cloning a snapshot shares the pixel data; the live buffer is never
/// aliased, so later drawing cannot reach back into history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<RgbaImage>);

impl Snapshot {
    pub fn capture(image: &RgbaImage) -> Self {
        Self(Arc::new(image.clone()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

/// Manages the snapshot history for undo/redo.
///
/// The last entry of the undo stack is always the current state; once the
/// first snapshot is in place the undo stack never drops below one entry.
#[derive(Debug, Default)]
pub struct HistoryManager {
    /// Oldest first, current state last
    undo_stack: Vec<Snapshot>,
    /// Most recently undone last
    redo_stack: Vec<Snapshot>,
    /// Maximum number of undo entries to retain
    limit: Option<usize>,
}

impl HistoryManager {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the undo stack; the oldest entries are dropped first.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::default()
        }
    }

    /// True once the initial snapshot has been recorded
    pub fn is_ready(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Discards all history and starts over from `initial`.
    pub fn reset_to(&mut self, initial: Snapshot) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push(initial);
    }

    /// Swaps the current state for `snapshot` without touching either stack's depth.
    ///
    /// Used when the live pixels were rescaled, so that the next commit is
    /// compared against what is actually on screen.
    pub fn replace_current(&mut self, snapshot: Snapshot) {
        match self.undo_stack.last_mut() {
            Some(current) => *current = snapshot,
            None => self.undo_stack.push(snapshot),
        }
    }

    /// Records a completed edit.
    ///
    /// Returns `false` when the snapshot equals the current state, in which
    /// case nothing is appended. The redo stack is cleared either way.
    pub fn commit(&mut self, snapshot: Snapshot) -> bool {
        self.redo_stack.clear();
        if self.undo_stack.last() == Some(&snapshot) {
            log::debug!("Commit skipped: state unchanged");
            return false;
        }
        self.undo_stack.push(snapshot);
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
        log::debug!("Committed snapshot; undo depth {}", self.undo_stack.len());
        true
    }

    /// Steps back one entry and returns the state to display, or `None`
    /// when only the initial snapshot remains.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.undo_stack.last()
    }

    /// Re-applies the most recently undone entry and returns it.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(next);
        self.undo_stack.last()
    }

    /// The state the surface should currently show
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

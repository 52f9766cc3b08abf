// memento.rs

use std::sync::Arc;

use crate::calculation::Calculation;

/// The full contents of the history log at one point in time.
///
/// Records are immutable and shared by `Arc`; each snapshot owns its own
/// sequence, so later changes to the log never show up here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<Arc<Calculation>>,
}

impl Snapshot {
    pub fn new(records: Vec<Arc<Calculation>>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Arc<Calculation>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Undo and redo stacks of history snapshots.
///
/// The undo stack holds at most `max_depth` snapshots; past that the oldest
/// are dropped, so only the most recent steps stay undoable.
#[derive(Debug)]
pub struct Caretaker {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl Default for Caretaker {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl Caretaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max_depth` is clamped to at least one snapshot.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
        }
    }

    /// Records the state from before a mutation. Anything that could have been
    /// redone is discarded.
    pub fn save(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo_stack.clear();
    }

    /// Discards everything that could have been redone.
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    pub fn peek_undo(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    pub fn peek_redo(&self) -> Option<&Snapshot> {
        self.redo_stack.last()
    }

    /// Pops the newest undo snapshot, parking `current` on the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pops the newest redo snapshot, parking `current` on the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drops both stacks and starts over from `seed`.
    pub fn reset(&mut self, seed: Snapshot) {
        self.clear();
        self.undo_stack.push(seed);
    }
}

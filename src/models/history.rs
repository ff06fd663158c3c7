// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history of guide snapshots.

use super::edit::EditTarget;
use super::guide::Guide;

/// History system for undo/redo functionality.
pub struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Guide>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Guide>,
    /// Maximum history size
    max_size: usize,
    /// Field written by the most recent recorded edit
    last_target: Option<EditTarget>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: 50, // Keep last 50 states
            last_target: None,
        }
    }

    /// Save current state before making a change
    pub fn push(&mut self, guide: Guide) {
        self.undo_stack.push(guide);
        // Limit history size
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // Clear redo stack when new action is performed
        self.redo_stack.clear();
    }

    /// Record the state before an edit on `target`.
    ///
    /// Consecutive edits to the same field share the entry made by the first.
    pub fn record(&mut self, guide: &Guide, target: EditTarget, coalesce: bool) {
        if coalesce && self.last_target == Some(target) {
            return;
        }
        self.push(guide.clone());
        self.last_target = coalesce.then_some(target);
    }

    /// Undo: restore previous state
    pub fn undo(&mut self, current: Guide) -> Option<Guide> {
        self.last_target = None;
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    pub fn redo(&mut self, current: Guide) -> Option<Guide> {
        self.last_target = None;
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_target = None;
    }
}

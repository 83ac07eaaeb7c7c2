//! Snapshot-based linear undo/redo history.
//!
//! # Invariants
//! - Recording a new snapshot clears the redo stack.
//! - Undo and redo swap the live document with a stored snapshot and push
//!   the displaced state onto the opposite stack.
//! - With a depth limit, the oldest undo snapshot is discarded first.

use crate::model::document::Document;
use std::collections::VecDeque;

/// Undo/redo stacks for one document.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: VecDeque<Document>,
    redo_stack: Vec<Document>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history keeping at most `limit` undo snapshots.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Stores the pre-mutation state of an accepted mutation.
    pub fn record(&mut self, previous: Document) {
        self.push_undo(previous);
        self.redo_stack.clear();
    }

    /// Replaces `current` with the latest undo snapshot.
    ///
    /// Returns `false` and leaves `current` untouched when there is nothing
    /// to undo.
    pub fn undo(&mut self, current: &mut Document) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        let displaced = std::mem::replace(current, previous);
        self.redo_stack.push(displaced);
        true
    }

    /// Replaces `current` with the latest redo snapshot.
    pub fn redo(&mut self, current: &mut Document) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let displaced = std::mem::replace(current, next);
        self.push_undo(displaced);
        true
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

    fn push_undo(&mut self, snapshot: Document) {
        self.undo_stack.push_back(snapshot);
        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
            }
        }
    }
}

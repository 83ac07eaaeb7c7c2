//! In-memory document store with optimistic-concurrency versioning.
//!
//! # Responsibility
//! - Own every live document together with its undo/redo history.
//! - Enforce the mutation protocol: lookup, version check, apply on a
//!   working copy, publish with `version + 1`, record history.
//!
//! # Invariants
//! - A document and its history live in one record keyed by document id.
//! - `version` changes only through accepted mutations, undo and redo.
//! - A rejected or failed mutation leaves document and history unchanged.

use crate::error::{EditError, EditResult};
use crate::model::document::{Document, DocumentId};
use crate::store::history::History;
use std::collections::HashMap;

/// One document and its history.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    document: Document,
    history: History,
}

impl DocumentRecord {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

/// Process-lifetime store of imported documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    records: HashMap<DocumentId, DocumentRecord>,
    history_limit: Option<usize>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose histories keep at most `limit` undo snapshots.
    pub fn with_history_limit(limit: Option<usize>) -> Self {
        Self {
            records: HashMap::new(),
            history_limit: limit,
        }
    }

    /// Registers a freshly imported document with an empty history.
    pub fn insert(&mut self, document: Document) -> &Document {
        let id = document.id;
        let record = DocumentRecord {
            document,
            history: History::with_limit(self.history_limit),
        };
        self.records.insert(id, record);
        &self.records[&id].document
    }

    pub fn get(&self, id: DocumentId) -> EditResult<&Document> {
        self.record(id).map(DocumentRecord::document)
    }

    pub fn record(&self, id: DocumentId) -> EditResult<&DocumentRecord> {
        self.records.get(&id).ok_or(EditError::DocumentNotFound(id))
    }

    /// Applies `op` under the versioned mutation protocol.
    ///
    /// `op` runs against a private copy; the copy is published with
    /// `version + 1` only when `op` succeeds.
    ///
    /// # Errors
    /// - `DocumentNotFound` for an unknown id.
    /// - `VersionConflict` when `base_version` is not the current version.
    /// - Any error returned by `op`.
    pub fn mutate<T, F>(
        &mut self,
        id: DocumentId,
        base_version: u64,
        op: F,
    ) -> EditResult<(&Document, T)>
    where
        F: FnOnce(&mut Document) -> EditResult<T>,
    {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(EditError::DocumentNotFound(id))?;
        if record.document.version != base_version {
            return Err(EditError::VersionConflict {
                current: record.document.version,
                presented: base_version,
            });
        }

        let mut working = record.document.clone();
        let output = op(&mut working)?;
        working.version = record.document.version + 1;

        let previous = std::mem::replace(&mut record.document, working);
        record.history.record(previous);
        Ok((&record.document, output))
    }

    /// Restores the previous snapshot of `id`.
    pub fn undo(&mut self, id: DocumentId) -> EditResult<&Document> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(EditError::DocumentNotFound(id))?;
        if !record.history.undo(&mut record.document) {
            return Err(EditError::NothingToUndo(id));
        }
        Ok(&record.document)
    }

    /// Re-applies the most recently undone snapshot of `id`.
    pub fn redo(&mut self, id: DocumentId) -> EditResult<&Document> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(EditError::DocumentNotFound(id))?;
        if !record.history.redo(&mut record.document) {
            return Err(EditError::NothingToRedo(id));
        }
        Ok(&record.document)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentStore;
    use crate::codec::lys::parse;
    use crate::error::EditError;
    use uuid::Uuid;

    #[test]
    fn insert_tracks_each_document_separately() {
        let mut store = DocumentStore::new();
        assert!(store.is_empty());
        let first = store.insert(parse("a(1,1)")).id;
        let second = store.insert(parse("b(2,1)")).id;
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn mutate_bumps_version_and_records_history() {
        let mut store = DocumentStore::new();
        let id = store.insert(parse("a(1,1)")).id;

        let (doc, ()) = store
            .mutate(id, 0, |doc| {
                doc.lines.clear();
                Ok(())
            })
            .unwrap();
        assert_eq!(doc.version, 1);
        assert!(doc.lines.is_empty());
        assert_eq!(store.record(id).unwrap().history().undo_depth(), 1);
    }

    #[test]
    fn stale_version_is_rejected() {
        let mut store = DocumentStore::new();
        let id = store.insert(parse("a(1,1)")).id;
        let err = store.mutate(id, 3, |_| Ok(())).unwrap_err();
        assert_eq!(
            err,
            EditError::VersionConflict {
                current: 0,
                presented: 3
            }
        );
        assert_eq!(store.get(id).unwrap().version, 0);
    }

    #[test]
    fn failed_op_leaves_document_and_history_unchanged() {
        let mut store = DocumentStore::new();
        let id = store.insert(parse("a(1,1)")).id;
        let before = store.get(id).unwrap().clone();

        let err = store
            .mutate(id, 0, |doc| -> Result<(), EditError> {
                doc.lines.clear();
                Err(EditError::InvalidOperation("boom".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidOperation(_)));
        assert_eq!(store.get(id).unwrap(), &before);
        assert!(!store.record(id).unwrap().history().can_undo());
    }

    #[test]
    fn unknown_document_is_not_found() {
        let mut store = DocumentStore::new();
        let missing = Uuid::new_v4();
        assert_eq!(
            store.get(missing).unwrap_err(),
            EditError::DocumentNotFound(missing)
        );
        assert_eq!(
            store.undo(missing).unwrap_err(),
            EditError::DocumentNotFound(missing)
        );
    }
}

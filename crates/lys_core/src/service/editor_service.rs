//! Editor use-case service.
//!
//! # Responsibility
//! - Provide the transport-agnostic entry points: import, export, get,
//!   move, new line, set prefix, insert tokens, sort lines, undo, redo.
//! - Route every mutation through the store's versioned protocol.
//! - Emit one structured log event per call.
//!
//! # Invariants
//! - Accepted mutations bump `version` by exactly one; rejected calls leave
//!   the document and its history untouched.
//! - Returned documents are snapshots; callers cannot alias live state.

use crate::codec::lys::{parse, serialize};
use crate::config::EditorConfig;
use crate::edit::lines::{self, NewToken};
use crate::edit::move_engine::{apply_move, MoveTarget};
use crate::edit::selection::SelectionRange;
use crate::error::EditResult;
use crate::model::document::{Document, DocumentId, LineId};
use crate::store::document_store::DocumentStore;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Request to move a token selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub document_id: DocumentId,
    pub base_version: u64,
    #[serde(default)]
    pub selection: Vec<SelectionRange>,
    pub target: MoveTarget,
}

/// Request to insert an empty lyric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineRequest {
    pub document_id: DocumentId,
    pub base_version: u64,
    /// `None` inserts at the document start.
    #[serde(default)]
    pub insert_after_line_id: Option<LineId>,
}

/// Request to set or clear a lyric line prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPrefixRequest {
    pub document_id: DocumentId,
    pub base_version: u64,
    pub line_id: LineId,
    /// Raw integer text; `None` or blank sets the `[]` marker.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Request to paste tokens into a lyric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertTokensRequest {
    pub document_id: DocumentId,
    pub base_version: u64,
    pub line_id: LineId,
    pub insert_at: usize,
    #[serde(default)]
    pub tokens: Vec<NewToken>,
}

/// Request to sort lyric lines by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortLinesRequest {
    pub document_id: DocumentId,
    pub base_version: u64,
}

/// Undo/redo availability for UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl HistoryState {
    pub fn can_undo(&self) -> bool {
        self.undo_depth > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo_depth > 0
    }
}

/// Facade owning the document store.
#[derive(Debug)]
pub struct EditorService {
    store: DocumentStore,
    config: EditorConfig,
}

impl Default for EditorService {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorService {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: DocumentStore::with_history_limit(config.history_limit),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Imports raw bytes as a new version-0 document.
    ///
    /// Invalid UTF-8 sequences are replaced, never rejected.
    pub fn import(&mut self, raw: &[u8]) -> Document {
        let text = String::from_utf8_lossy(raw);
        self.import_text(&text)
    }

    /// Imports text as a new version-0 document with an empty history.
    pub fn import_text(&mut self, text: &str) -> Document {
        let document = self.store.insert(parse(text)).clone();
        info!(
            "event=doc_import module=service status=ok doc_id={} lines={} tokens={}",
            document.id,
            document.lines.len(),
            document.token_count()
        );
        document
    }

    /// Serializes the current state of a document.
    pub fn export(&self, document_id: DocumentId) -> EditResult<String> {
        let result = self.store.get(document_id).map(serialize);
        if let Err(err) = &result {
            warn!(
                "event=doc_export module=service status=error doc_id={} error_code={}",
                document_id,
                err.code()
            );
        }
        result
    }

    /// Returns a snapshot of the current document.
    pub fn get(&self, document_id: DocumentId) -> EditResult<Document> {
        self.store.get(document_id).cloned()
    }

    pub fn history_state(&self, document_id: DocumentId) -> EditResult<HistoryState> {
        let history = self.store.record(document_id)?.history();
        Ok(HistoryState {
            undo_depth: history.undo_depth(),
            redo_depth: history.redo_depth(),
        })
    }

    /// Moves a token selection to a target.
    pub fn move_tokens(&mut self, request: &MoveRequest) -> EditResult<Document> {
        let options = self.config.move_options();
        self.commit(
            "doc_move",
            request.document_id,
            request.base_version,
            |doc| apply_move(doc, &request.selection, &request.target, options).map(|_| ()),
        )
    }

    /// Inserts an empty lyric line.
    pub fn new_line(&mut self, request: &NewLineRequest) -> EditResult<Document> {
        self.commit(
            "doc_new_line",
            request.document_id,
            request.base_version,
            |doc| lines::insert_blank_line(doc, request.insert_after_line_id).map(|_| ()),
        )
    }

    /// Sets or clears a lyric line prefix.
    pub fn set_prefix(&mut self, request: &SetPrefixRequest) -> EditResult<Document> {
        self.commit(
            "doc_set_prefix",
            request.document_id,
            request.base_version,
            |doc| lines::set_prefix(doc, request.line_id, request.prefix.as_deref()),
        )
    }

    /// Pastes tokens with fresh identities into a lyric line.
    pub fn insert_tokens(&mut self, request: &InsertTokensRequest) -> EditResult<Document> {
        self.commit(
            "doc_insert_tokens",
            request.document_id,
            request.base_version,
            |doc| {
                lines::insert_tokens(doc, request.line_id, request.insert_at, &request.tokens)
                    .map(|_| ())
            },
        )
    }

    /// Sorts lyric lines by first-token start time.
    pub fn sort_lines(&mut self, request: &SortLinesRequest) -> EditResult<Document> {
        self.commit(
            "doc_sort_lines",
            request.document_id,
            request.base_version,
            |doc| {
                lines::sort_lines(doc);
                Ok(())
            },
        )
    }

    pub fn undo(&mut self, document_id: DocumentId) -> EditResult<Document> {
        let result = self.store.undo(document_id).cloned();
        log_outcome("doc_undo", document_id, &result);
        result
    }

    pub fn redo(&mut self, document_id: DocumentId) -> EditResult<Document> {
        let result = self.store.redo(document_id).cloned();
        log_outcome("doc_redo", document_id, &result);
        result
    }

    fn commit<F>(
        &mut self,
        event: &'static str,
        document_id: DocumentId,
        base_version: u64,
        op: F,
    ) -> EditResult<Document>
    where
        F: FnOnce(&mut Document) -> EditResult<()>,
    {
        let result = self
            .store
            .mutate(document_id, base_version, op)
            .map(|(document, ())| document.clone());
        log_outcome(event, document_id, &result);
        result
    }
}

fn log_outcome(event: &'static str, document_id: DocumentId, result: &EditResult<Document>) {
    match result {
        Ok(document) => info!(
            "event={} module=service status=ok doc_id={} version={}",
            event, document_id, document.version
        ),
        Err(err) => warn!(
            "event={} module=service status=rejected doc_id={} error_code={} error={}",
            event,
            document_id,
            err.code(),
            err
        ),
    }
}

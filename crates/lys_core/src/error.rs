//! Error values shared by selection, move, store and history operations.
//!
//! # Invariants
//! - Every failed call returns one of these values; none are retried
//!   internally and none abort the process.
//! - A returned error means the target document was left unchanged.

use crate::model::document::{DocumentId, LineId, TokenId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by editing APIs.
pub type EditResult<T> = Result<T, EditError>;

/// Coarse error classification for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    VersionConflict,
    InvalidTarget,
    InvalidOperation,
    NothingToUndo,
    NothingToRedo,
}

/// Editing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    DocumentNotFound(DocumentId),
    LineNotFound(LineId),
    TokenNotFound {
        line_id: LineId,
        token_id: TokenId,
    },
    /// Presented base version differs from the current one.
    VersionConflict {
        current: u64,
        presented: u64,
    },
    /// Move target is malformed or self-referential.
    InvalidTarget(String),
    /// Operation is not valid for the addressed line or input.
    InvalidOperation(String),
    NothingToUndo(DocumentId),
    NothingToRedo(DocumentId),
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound(_) | Self::LineNotFound(_) | Self::TokenNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::VersionConflict { .. } => ErrorKind::VersionConflict,
            Self::InvalidTarget(_) => ErrorKind::InvalidTarget,
            Self::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Self::NothingToUndo(_) => ErrorKind::NothingToUndo,
            Self::NothingToRedo(_) => ErrorKind::NothingToRedo,
        }
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::VersionConflict => "version_conflict",
            ErrorKind::InvalidTarget => "invalid_target",
            ErrorKind::InvalidOperation => "invalid_operation",
            ErrorKind::NothingToUndo => "nothing_to_undo",
            ErrorKind::NothingToRedo => "nothing_to_redo",
        }
    }
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::LineNotFound(id) => write!(f, "line not found: {id}"),
            Self::TokenNotFound { line_id, token_id } => {
                write!(f, "token not found in line {line_id}: {token_id}")
            }
            Self::VersionConflict { current, presented } => write!(
                f,
                "version conflict: document is at {current}, request was based on {presented}"
            ),
            Self::InvalidTarget(message) => write!(f, "invalid move target: {message}"),
            Self::InvalidOperation(message) => write!(f, "invalid operation: {message}"),
            Self::NothingToUndo(id) => write!(f, "nothing to undo for document {id}"),
            Self::NothingToRedo(id) => write!(f, "nothing to redo for document {id}"),
        }
    }
}

impl Error for EditError {}

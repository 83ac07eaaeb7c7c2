//! Token-range selection resolution.
//!
//! # Invariants
//! - Output positions are sorted by `(line_index, token_index)` regardless of
//!   the order ranges were submitted in.
//! - Each concrete position appears at most once.

use crate::error::{EditError, EditResult};
use crate::model::document::{Document, Line, LineId, TokenId};
use serde::{Deserialize, Serialize};

/// Inclusive token range within one line, addressed by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub line_id: LineId,
    pub start_token_id: TokenId,
    /// May precede `start_token_id`; the range is normalized.
    pub end_token_id: TokenId,
}

impl SelectionRange {
    pub fn new(line_id: LineId, start_token_id: TokenId, end_token_id: TokenId) -> Self {
        Self {
            line_id,
            start_token_id,
            end_token_id,
        }
    }

    /// Range covering exactly one token.
    pub fn single(line_id: LineId, token_id: TokenId) -> Self {
        Self::new(line_id, token_id, token_id)
    }
}

/// Concrete position of one token in the current document layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenPosition {
    pub line_index: usize,
    pub token_index: usize,
}

/// Resolves identity ranges into document-ordered token positions.
///
/// # Errors
/// - `LineNotFound` when a range names an absent line.
/// - `TokenNotFound` when either boundary token is absent from that line.
pub fn resolve_selection(
    document: &Document,
    ranges: &[SelectionRange],
) -> EditResult<Vec<TokenPosition>> {
    let mut positions = Vec::new();
    for range in ranges {
        let line_index = document
            .line_index(range.line_id)
            .ok_or(EditError::LineNotFound(range.line_id))?;
        let line = &document.lines[line_index];
        let a = require_token(line, range.start_token_id)?;
        let b = require_token(line, range.end_token_id)?;
        let (first, last) = if a <= b { (a, b) } else { (b, a) };
        positions.extend((first..=last).map(|token_index| TokenPosition {
            line_index,
            token_index,
        }));
    }

    positions.sort_unstable();
    positions.dedup();
    Ok(positions)
}

pub(crate) fn require_token(line: &Line, token_id: TokenId) -> EditResult<usize> {
    line.token_index(token_id).ok_or(EditError::TokenNotFound {
        line_id: line.id,
        token_id,
    })
}

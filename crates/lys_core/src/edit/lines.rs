//! Line-level document mutations.
//!
//! # Responsibility
//! - Insert blank lyric lines.
//! - Set or clear the bracketed integer prefix of a lyric line.
//! - Paste freshly identified tokens into a lyric line.
//! - Sort lyric lines by first-token start time.
//!
//! # Invariants
//! - Validation happens before any write; a returned error means the
//!   document is unchanged.
//! - Meta lines are never modified by these operations.

use crate::codec::lys::EMPTY_PREFIX;
use crate::error::{EditError, EditResult};
use crate::model::document::{Document, Line, LineId, Timestamp, Token, TokenId};
use serde::{Deserialize, Serialize};

/// Token payload supplied by a paste request; identity is minted on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewToken {
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl NewToken {
    pub fn new(text: impl Into<String>, timestamp: Option<Timestamp>) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// Inserts an empty lyric line after `after`, or at the document start.
///
/// Returns the new line id.
pub fn insert_blank_line(document: &mut Document, after: Option<LineId>) -> EditResult<LineId> {
    let index = match after {
        Some(line_id) => {
            document
                .line_index(line_id)
                .ok_or(EditError::LineNotFound(line_id))?
                + 1
        }
        None => 0,
    };
    let line = Line::empty();
    let line_id = line.id;
    document.lines.insert(index, line);
    Ok(line_id)
}

/// Converts raw prefix input into a line prefix string.
///
/// - `None` or blank input maps to the empty-bracket marker `[]`.
/// - A non-negative integer `n` maps to `[n]`.
///
/// # Errors
/// - `InvalidOperation` for negative or non-integer input.
pub fn prefix_from_input(value: Option<&str>) -> EditResult<String> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(EMPTY_PREFIX.to_string());
    };
    let number = raw.parse::<i64>().map_err(|_| {
        EditError::InvalidOperation(format!("prefix must be an integer or empty, got `{raw}`"))
    })?;
    if number < 0 {
        return Err(EditError::InvalidOperation(format!(
            "prefix must be >= 0, got {number}"
        )));
    }
    Ok(format!("[{number}]"))
}

/// Sets the prefix of a lyric line from raw input.
pub fn set_prefix(document: &mut Document, line_id: LineId, value: Option<&str>) -> EditResult<()> {
    let line = lyric_line_mut(document, line_id, "set prefix on")?;
    let prefix = prefix_from_input(value)?;
    line.prefix = prefix;
    Ok(())
}

/// Inserts copies of `tokens` with fresh identities at `index` in a lyric
/// line, preserving their order. Returns the new token ids.
///
/// # Errors
/// - `InvalidOperation` when `index > len` or the line is meta.
pub fn insert_tokens(
    document: &mut Document,
    line_id: LineId,
    index: usize,
    tokens: &[NewToken],
) -> EditResult<Vec<TokenId>> {
    let line = lyric_line_mut(document, line_id, "insert tokens into")?;
    if index > line.tokens.len() {
        return Err(EditError::InvalidOperation(format!(
            "insert index {index} out of range for line with {} tokens",
            line.tokens.len()
        )));
    }

    let fresh: Vec<Token> = tokens
        .iter()
        .map(|token| Token::new(token.text.clone(), token.timestamp))
        .collect();
    let ids: Vec<TokenId> = fresh.iter().map(|token| token.id).collect();
    line.tokens.splice(index..index, fresh);
    Ok(ids)
}

/// Groups meta lines first, then stable-sorts lyric lines by the start of
/// their first token. Lines without tokens or without a leading timestamp
/// go last.
pub fn sort_lines(document: &mut Document) {
    let (meta, mut lyric): (Vec<Line>, Vec<Line>) = std::mem::take(&mut document.lines)
        .into_iter()
        .partition(|line| line.is_meta);
    lyric.sort_by_key(|line| match line.first_start() {
        Some(start) => (false, start),
        None => (true, 0),
    });
    document.lines = meta;
    document.lines.append(&mut lyric);
}

fn lyric_line_mut<'doc>(
    document: &'doc mut Document,
    line_id: LineId,
    action: &str,
) -> EditResult<&'doc mut Line> {
    let index = document
        .line_index(line_id)
        .ok_or(EditError::LineNotFound(line_id))?;
    let line = &mut document.lines[index];
    if line.is_meta {
        return Err(EditError::InvalidOperation(format!(
            "cannot {action} meta line {line_id}"
        )));
    }
    Ok(line)
}

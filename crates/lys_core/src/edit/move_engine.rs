//! Token move/splice engine.
//!
//! # Responsibility
//! - Relocate an arbitrary multi-line token selection to an anchor, a new
//!   line, or a line edge.
//! - Drop lyric lines left empty by the move.
//!
//! # Invariants
//! - Moved tokens keep their identity, timestamp and text.
//! - Moved tokens land contiguously, in document order of their sources.
//! - Every failure is detected before the document is touched.

use crate::edit::selection::{require_token, resolve_selection, SelectionRange, TokenPosition};
use crate::error::{EditError, EditResult};
use crate::model::document::{Document, Line, LineId, Token, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Side of the anchor token where moved tokens are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPosition {
    Before,
    After,
}

impl FromStr for AnchorPosition {
    type Err = EditError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(EditError::InvalidTarget(format!(
                "unknown anchor position `{other}`; expected before|after"
            ))),
        }
    }
}

/// Edge of an existing line where moved tokens are inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEdge {
    Start,
    #[default]
    End,
}

impl FromStr for LineEdge {
    type Err = EditError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => Err(EditError::InvalidTarget(format!(
                "unknown line position `{other}`; expected start|end"
            ))),
        }
    }
}

/// Destination of a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveTarget {
    /// Next to an existing token that is not part of the selection.
    Anchor {
        line_id: LineId,
        anchor_token_id: TokenId,
        position: AnchorPosition,
    },
    /// Into a brand-new lyric line after `insert_after_line_id`, or at the
    /// document start when absent.
    NewLine {
        #[serde(default)]
        insert_after_line_id: Option<LineId>,
    },
    /// At the start or end of an existing lyric line.
    LineEdge {
        line_id: LineId,
        #[serde(default)]
        position: LineEdge,
    },
}

/// Move behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Drop lyric lines that end up with zero tokens.
    pub delete_empty_lines: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            delete_empty_lines: true,
        }
    }
}

/// Moves the selected tokens to `target`, returning how many tokens moved.
///
/// An empty selection is a no-op returning `0`.
///
/// # Errors
/// - `LineNotFound` / `TokenNotFound` for unresolved selection or target ids.
/// - `InvalidTarget` when the anchor is selected or the target is a meta line.
/// - `InvalidOperation` when the selection includes a meta line token.
pub fn apply_move(
    document: &mut Document,
    ranges: &[SelectionRange],
    target: &MoveTarget,
    options: MoveOptions,
) -> EditResult<usize> {
    if ranges.is_empty() {
        return Ok(0);
    }
    let positions = resolve_selection(document, ranges)?;
    if positions.is_empty() {
        return Ok(0);
    }
    let selected = selected_ids(document, &positions)?;
    validate_target(document, target, &selected)?;

    // Positions are ascending, so reverse iteration removes by descending
    // line then descending token index and never shifts a pending index.
    let mut moving: Vec<Token> = positions
        .iter()
        .rev()
        .map(|position| {
            document.lines[position.line_index]
                .tokens
                .remove(position.token_index)
        })
        .collect();
    moving.reverse();
    let moved = moving.len();

    let (line_index, insert_at) = place_target(document, target)?;
    document.lines[line_index]
        .tokens
        .splice(insert_at..insert_at, moving);

    if options.delete_empty_lines {
        remove_empty_lyric_lines(document);
    }
    Ok(moved)
}

/// Drops every non-meta line without tokens. Meta lines are always kept.
pub fn remove_empty_lyric_lines(document: &mut Document) {
    document
        .lines
        .retain(|line| line.is_meta || !line.tokens.is_empty());
}

fn selected_ids(document: &Document, positions: &[TokenPosition]) -> EditResult<HashSet<TokenId>> {
    let mut ids = HashSet::with_capacity(positions.len());
    for position in positions {
        let line = &document.lines[position.line_index];
        if line.is_meta {
            return Err(EditError::InvalidOperation(format!(
                "meta line {} cannot be part of a selection",
                line.id
            )));
        }
        ids.insert(line.tokens[position.token_index].id);
    }
    Ok(ids)
}

fn validate_target(
    document: &Document,
    target: &MoveTarget,
    selected: &HashSet<TokenId>,
) -> EditResult<()> {
    match target {
        MoveTarget::Anchor {
            line_id,
            anchor_token_id,
            ..
        } => {
            let line = lyric_target_line(document, *line_id)?;
            require_token(line, *anchor_token_id)?;
            if selected.contains(anchor_token_id) {
                return Err(EditError::InvalidTarget(
                    "anchor token is within the selection".to_string(),
                ));
            }
        }
        MoveTarget::NewLine {
            insert_after_line_id: Some(line_id),
        } => {
            document
                .line_index(*line_id)
                .ok_or(EditError::LineNotFound(*line_id))?;
        }
        MoveTarget::NewLine {
            insert_after_line_id: None,
        } => {}
        MoveTarget::LineEdge { line_id, .. } => {
            lyric_target_line(document, *line_id)?;
        }
    }
    Ok(())
}

fn lyric_target_line(document: &Document, line_id: LineId) -> EditResult<&Line> {
    let index = document
        .line_index(line_id)
        .ok_or(EditError::LineNotFound(line_id))?;
    let line = &document.lines[index];
    if line.is_meta {
        return Err(EditError::InvalidTarget(format!(
            "meta line {line_id} cannot receive tokens"
        )));
    }
    Ok(line)
}

/// Resolves `(line_index, insert_at)` against the post-removal layout.
fn place_target(document: &mut Document, target: &MoveTarget) -> EditResult<(usize, usize)> {
    match target {
        MoveTarget::Anchor {
            line_id,
            anchor_token_id,
            position,
        } => {
            let line_index = document
                .line_index(*line_id)
                .ok_or(EditError::LineNotFound(*line_id))?;
            let anchor = require_token(&document.lines[line_index], *anchor_token_id)?;
            let insert_at = match position {
                AnchorPosition::Before => anchor,
                AnchorPosition::After => anchor + 1,
            };
            Ok((line_index, insert_at))
        }
        MoveTarget::NewLine {
            insert_after_line_id,
        } => {
            let line_index = match insert_after_line_id {
                Some(line_id) => {
                    document
                        .line_index(*line_id)
                        .ok_or(EditError::LineNotFound(*line_id))?
                        + 1
                }
                None => 0,
            };
            document.lines.insert(line_index, Line::empty());
            Ok((line_index, 0))
        }
        MoveTarget::LineEdge { line_id, position } => {
            let line_index = document
                .line_index(*line_id)
                .ok_or(EditError::LineNotFound(*line_id))?;
            let insert_at = match position {
                LineEdge::Start => 0,
                LineEdge::End => document.lines[line_index].tokens.len(),
            };
            Ok((line_index, insert_at))
        }
    }
}

//! Lyrics document model.
//!
//! # Responsibility
//! - Define the document/line/token records shared by codec, edit engine and
//!   store.
//! - Provide constructors that mint fresh stable identities.
//!
//! # Invariants
//! - Token `id`, `timestamp` and `text` never change when a token is moved.
//! - A meta line holds exactly one untimed token with the verbatim source
//!   text, and its `prefix` is empty.
//! - A non-meta line may hold zero tokens only transiently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one imported document.
pub type DocumentId = Uuid;
/// Stable identifier of one line inside a document.
pub type LineId = Uuid;
/// Stable identifier of one token; survives moves between lines.
pub type TokenId = Uuid;

/// Timing of one token, in the units of the source file (milliseconds for
/// `.lys`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub start: u64,
    pub duration: u64,
}

impl Timestamp {
    pub fn new(start: u64, duration: u64) -> Self {
        Self { start, duration }
    }
}

/// Smallest unit of selection and movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// `None` for meta tokens and trailing untimed text.
    pub timestamp: Option<Timestamp>,
    pub text: String,
}

impl Token {
    /// Creates a token with a freshly generated identity.
    pub fn new(text: impl Into<String>, timestamp: Option<Timestamp>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            text: text.into(),
        }
    }

    pub fn timed(text: impl Into<String>, start: u64, duration: u64) -> Self {
        Self::new(text, Some(Timestamp::new(start, duration)))
    }
}

/// One physical line of a lyrics document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    /// Empty, `[<n>]` or the empty-bracket marker `[]`.
    pub prefix: String,
    pub is_meta: bool,
    pub tokens: Vec<Token>,
}

impl Line {
    /// Creates an editable lyric line.
    pub fn lyric(prefix: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prefix: prefix.into(),
            is_meta: false,
            tokens,
        }
    }

    /// Creates an empty editable line.
    pub fn empty() -> Self {
        Self::lyric(String::new(), Vec::new())
    }

    /// Wraps verbatim source text into an opaque meta line.
    pub fn meta(raw: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prefix: String::new(),
            is_meta: true,
            tokens: vec![Token::new(raw, None)],
        }
    }

    /// Start time of the first token, used as the sort key for lyric lines.
    pub fn first_start(&self) -> Option<u64> {
        self.tokens
            .first()
            .and_then(|token| token.timestamp)
            .map(|timestamp| timestamp.start)
    }

    /// Returns the index of `token_id` within this line.
    pub fn token_index(&self, token_id: TokenId) -> Option<usize> {
        self.tokens.iter().position(|token| token.id == token_id)
    }
}

/// Structured `.lys` document with its optimistic-concurrency version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Incremented by exactly one on every accepted mutation.
    pub version: u64,
    pub lines: Vec<Line>,
}

impl Document {
    /// Creates a version-0 document with a fresh identity.
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 0,
            lines,
        }
    }

    /// Returns the index of `line_id` within this document.
    pub fn line_index(&self, line_id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == line_id)
    }

    /// Total token count across all lines, meta tokens included.
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|line| line.tokens.len()).sum()
    }

    /// Iterates every token id in document order.
    pub fn token_ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.lines
            .iter()
            .flat_map(|line| line.tokens.iter().map(|token| token.id))
    }
}

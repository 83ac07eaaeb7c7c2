//! `.lys` text parser and serializer.
//!
//! # Responsibility
//! - Translate raw `.lys` text into a structured [`Document`].
//! - Render a [`Document`] back to `.lys` text.
//!
//! # Invariants
//! - Parsing never fails: content that is not a header and yields no timed
//!   token is kept verbatim as a meta line.
//! - For well-formed ASCII-bracket input, `serialize(parse(text)) == text`.
//! - Full-width brackets are accepted on input and written back as ASCII.

use crate::model::document::{Document, Line, Timestamp, Token};
use once_cell::sync::Lazy;
use regex::Regex;

/// Empty-bracket line prefix marker.
pub const EMPTY_PREFIX: &str = "[]";

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[(ti|ar|al|by):").expect("valid header regex"));
static LINE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[0-9]+\]").expect("valid line prefix regex"));
// ASCII and full-width bracket pairs must not mix within one token.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(.*?)(?:\(([0-9]+),([0-9]+)\)|（([0-9]+),([0-9]+)）)")
        .expect("valid token regex")
});

/// Parses raw `.lys` text into a fresh version-0 document.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line; a trailing terminator
/// does not add an empty line.
pub fn parse(raw_text: &str) -> Document {
    let lines = physical_lines(raw_text)
        .into_iter()
        .map(parse_line)
        .collect();
    Document::new(lines)
}

/// Parses one physical line (without terminator).
pub fn parse_line(raw: &str) -> Line {
    if raw.is_empty() {
        return Line::empty();
    }
    if HEADER_RE.is_match(raw) {
        return Line::meta(raw);
    }

    let (prefix, rest) = split_prefix(raw);
    match scan_tokens(rest) {
        Some(tokens) => Line::lyric(prefix, tokens),
        // The stripped prefix is dropped here; the meta line keeps `raw`.
        None => Line::meta(raw),
    }
}

/// Serializes a document to `.lys` text, joining lines with `\n`.
pub fn serialize(document: &Document) -> String {
    document
        .lines
        .iter()
        .map(serialize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes one line without terminator.
pub fn serialize_line(line: &Line) -> String {
    if line.is_meta {
        return line.tokens.iter().map(|token| token.text.as_str()).collect();
    }

    let mut out = String::with_capacity(line.prefix.len() + line.tokens.len() * 16);
    out.push_str(&line.prefix);
    for token in &line.tokens {
        out.push_str(&token.text);
        if let Some(Timestamp { start, duration }) = token.timestamp {
            out.push_str(&format!("({start},{duration})"));
        }
    }
    out
}

fn split_prefix(raw: &str) -> (&str, &str) {
    if let Some(found) = LINE_PREFIX_RE.find(raw) {
        return raw.split_at(found.end());
    }
    if raw.starts_with(EMPTY_PREFIX) {
        return raw.split_at(EMPTY_PREFIX.len());
    }
    ("", raw)
}

/// Returns `None` when the remainder holds no timed token, or when a time
/// value does not fit `u64`.
fn scan_tokens(rest: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut consumed = 0;
    for caps in TOKEN_RE.captures_iter(rest) {
        let (start, duration) = match (caps.get(2), caps.get(3)) {
            (Some(start), Some(duration)) => (start, duration),
            _ => (caps.get(4)?, caps.get(5)?),
        };
        let start = start.as_str().parse::<u64>().ok()?;
        let duration = duration.as_str().parse::<u64>().ok()?;
        let text = caps.get(1).map_or("", |m| m.as_str());
        tokens.push(Token::timed(text, start, duration));
        consumed = caps.get(0).map_or(consumed, |m| m.end());
    }

    if tokens.is_empty() {
        return None;
    }
    let trailing = &rest[consumed..];
    if !trailing.is_empty() {
        tokens.push(Token::new(trailing, None));
    }
    Some(tokens)
}

fn physical_lines(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut cursor = 0;
    while cursor < bytes.len() {
        match bytes[cursor] {
            b'\n' => {
                lines.push(&raw[start..cursor]);
                cursor += 1;
                start = cursor;
            }
            b'\r' => {
                lines.push(&raw[start..cursor]);
                cursor += if bytes.get(cursor + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                start = cursor;
            }
            _ => cursor += 1,
        }
    }
    if start < raw.len() {
        lines.push(&raw[start..]);
    }
    lines
}

//! Text format codecs.
//!
//! # Responsibility
//! - Convert between the `.lys` wire format and the document model.
//! - Keep grammar details (regexes, bracket styles) inside this boundary.

pub mod lys;

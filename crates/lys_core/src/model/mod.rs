//! Domain model for timed-lyrics documents.
//!
//! # Responsibility
//! - Define the document, line and token records used by every layer.
//!
//! # Invariants
//! - Every document, line and token carries a stable UUID identity.
//! - Token identity is preserved across moves; only paste mints new ids.

pub mod document;

//! Document ownership and history.
//!
//! # Responsibility
//! - Keep every live document and its history as one aggregate.
//! - Expose only the versioned mutation protocol plus undo/redo.
//!
//! # Invariants
//! - State lives for the process lifetime only; nothing is persisted.

pub mod document_store;
pub mod history;

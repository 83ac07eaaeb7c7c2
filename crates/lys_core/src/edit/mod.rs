//! Structural edit engine.
//!
//! # Responsibility
//! - Resolve identity-based token selections.
//! - Apply moves and line-level mutations to a document in place.
//!
//! # Invariants
//! - Operations validate before writing, so a failed call leaves the
//!   document untouched.
//! - Versioning and history are the store's concern, not this module's.

pub mod lines;
pub mod move_engine;
pub mod selection;

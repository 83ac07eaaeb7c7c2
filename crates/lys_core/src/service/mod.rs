//! Core use-case services.
//!
//! # Responsibility
//! - Expose request-level editor operations to transport layers.
//! - Keep CLI/HTTP glue decoupled from store and engine details.

pub mod editor_service;

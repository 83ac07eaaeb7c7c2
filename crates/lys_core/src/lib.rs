//! Core document model and structural edit engine for `.lys` timed lyrics.
//! This crate is the single source of truth for editing invariants.

pub mod codec;
pub mod config;
pub mod edit;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::lys::{parse, serialize};
pub use config::{EditorConfig, LoggingConfig};
pub use edit::lines::NewToken;
pub use edit::move_engine::{apply_move, AnchorPosition, LineEdge, MoveOptions, MoveTarget};
pub use edit::selection::{resolve_selection, SelectionRange, TokenPosition};
pub use error::{EditError, EditResult, ErrorKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, DocumentId, Line, LineId, Timestamp, Token, TokenId};
pub use service::editor_service::{
    EditorService, HistoryState, InsertTokensRequest, MoveRequest, NewLineRequest,
    SetPrefixRequest, SortLinesRequest,
};
pub use store::document_store::DocumentStore;
pub use store::history::History;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

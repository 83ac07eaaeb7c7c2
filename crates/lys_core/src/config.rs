//! Editor runtime configuration.
//!
//! # Responsibility
//! - Hold tunables for move cleanup, history depth and logging.
//! - Read overrides from `LYS_*` environment variables.
//!
//! # Invariants
//! - Malformed environment values never fail startup; they fall back to
//!   defaults and emit a warning.

use crate::edit::move_engine::MoveOptions;
use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use log::warn;
use std::path::{Path, PathBuf};

pub const ENV_DELETE_EMPTY_LINES: &str = "LYS_DELETE_EMPTY_LINES";
pub const ENV_HISTORY_LIMIT: &str = "LYS_HISTORY_LIMIT";
pub const ENV_LOG_LEVEL: &str = "LYS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LYS_LOG_DIR";

/// Logging backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Drop lyric lines emptied by a move.
    pub delete_empty_lines: bool,
    /// Maximum undo snapshots per document; `None` is unbounded.
    pub history_limit: Option<usize>,
    pub logging: LoggingConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            delete_empty_lines: true,
            history_limit: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Builds configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_overrides(lookup)
    }

    /// Applies `LYS_*` environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` on top of `self`; malformed values keep
    /// the current setting.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = non_blank(lookup(ENV_DELETE_EMPTY_LINES)) {
            match parse_flag(&raw) {
                Some(value) => self.delete_empty_lines = value,
                None => warn_fallback(ENV_DELETE_EMPTY_LINES),
            }
        }

        if let Some(raw) = non_blank(lookup(ENV_HISTORY_LIMIT)) {
            match raw.parse::<usize>() {
                Ok(limit) => self.history_limit = Some(limit),
                Err(_) => warn_fallback(ENV_HISTORY_LIMIT),
            }
        }

        if let Some(raw) = non_blank(lookup(ENV_LOG_LEVEL)) {
            match normalize_level(&raw) {
                Ok(level) => self.logging.level = level.to_string(),
                Err(_) => warn_fallback(ENV_LOG_LEVEL),
            }
        }

        if let Some(raw) = non_blank(lookup(ENV_LOG_DIR)) {
            match normalize_log_dir(Path::new(&raw)) {
                Ok(dir) => self.logging.log_dir = Some(dir),
                Err(_) => warn_fallback(ENV_LOG_DIR),
            }
        }

        self
    }

    pub fn move_options(&self) -> MoveOptions {
        MoveOptions {
            delete_empty_lines: self.delete_empty_lines,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn warn_fallback(key: &str) {
    warn!("event=config_load module=config status=fallback key={key}");
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Error types for infotexts.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=store, 3=state, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationIssue;

/// Result type alias for infotexts operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Store (exit 2)
    StoreUnavailable,
    InvalidProjectStore,
    ProjectExists,
    DatabaseError,

    // Store lifecycle (exit 3)
    NoActiveStore,
    NoProjectBound,
    InvalidTransition,
    EntryNotFound,

    // Validation (exit 4)
    ValidationError,
    DocumentError,
    InvalidArgument,

    // Translation (exit 6)
    TranslationFailure,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::InvalidProjectStore => "INVALID_PROJECT_STORE",
            Self::ProjectExists => "PROJECT_EXISTS",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::NoActiveStore => "NO_ACTIVE_STORE",
            Self::NoProjectBound => "NO_PROJECT_BOUND",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::EntryNotFound => "ENTRY_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DocumentError => "DOCUMENT_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::TranslationFailure => "TRANSLATION_FAILURE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StoreUnavailable
            | Self::InvalidProjectStore
            | Self::ProjectExists
            | Self::DatabaseError => 2,
            Self::NoActiveStore
            | Self::NoProjectBound
            | Self::InvalidTransition
            | Self::EntryNotFound => 3,
            Self::ValidationError | Self::DocumentError | Self::InvalidArgument => 4,
            Self::TranslationFailure => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller can recover by answering a prompt or fixing input.
    ///
    /// True for validation problems and a missing project binding, both of
    /// which the front-end resolves by asking the user. False for store
    /// corruption, I/O and internal errors.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ValidationError
                | Self::InvalidArgument
                | Self::NoProjectBound
                | Self::TranslationFailure
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in infotexts operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("Invalid project store at {}: {reason}", path.display())]
    InvalidProjectStore { path: PathBuf, reason: String },

    #[error("A project store already exists at {}", path.display())]
    ProjectExists { path: PathBuf },

    #[error("No active store")]
    NoActiveStore,

    #[error("No project bound to the active store")]
    NoProjectBound,

    #[error("Cannot {op} while {state}")]
    InvalidTransition { op: &'static str, state: &'static str },

    #[error("Entry not found: {id}")]
    EntryNotFound { id: i64 },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationIssue),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Translation failed for entry {entry_id} ({tag}): {message}")]
    Translation {
        entry_id: i64,
        tag: String,
        message: String,
    },

    #[error("Translator error: {0}")]
    Translator(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::StoreUnavailable { .. } => ErrorCode::StoreUnavailable,
            Self::InvalidProjectStore { .. } => ErrorCode::InvalidProjectStore,
            Self::ProjectExists { .. } => ErrorCode::ProjectExists,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::NoActiveStore => ErrorCode::NoActiveStore,
            Self::NoProjectBound => ErrorCode::NoProjectBound,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::EntryNotFound { .. } => ErrorCode::EntryNotFound,
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::Document(_) => ErrorCode::DocumentError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Translation { .. } | Self::Translator(_) => ErrorCode::TranslationFailure,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for the user.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::StoreUnavailable { path, .. } => Some(format!(
                "Check that {} is a project store created by `itx project create`.",
                path.display()
            )),

            Self::InvalidProjectStore { .. } => Some(
                "The store has no project row. Create a fresh project with `itx project create <name>`."
                    .to_string(),
            ),

            Self::ProjectExists { path } => Some(format!(
                "Open it instead: itx --project {} <command>",
                path.display()
            )),

            Self::NoActiveStore => Some(
                "Create a project (`itx project create <name>`) or pass `--project <store>`."
                    .to_string(),
            ),

            Self::NoProjectBound => Some(
                "Name a project to save into:\n  \
                 itx project create <name>\n  \
                 itx run <file> --to <language> -o <out> --project-name <name>"
                    .to_string(),
            ),

            Self::Validation(issue) => issue.hint(),

            Self::Translation { .. } | Self::Translator(_) => Some(
                "Entries translated before the failure were kept. Re-run `itx translate` to continue."
                    .to_string(),
            ),

            Self::InvalidTransition { .. }
            | Self::EntryNotFound { .. }
            | Self::Document(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, recoverability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "recoverable": code.is_recoverable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

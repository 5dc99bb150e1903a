//! Error types for add-model
//!
//! This module provides unified error handling across the reader, the
//! emitter and the command line, including parse errors, registry errors
//! and IO errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for add-model
#[derive(Debug, Error)]
pub enum ScaffoldError {
    // ========================================================================
    // Usage Errors
    // ========================================================================
    /// The command line was incomplete or inconsistent
    #[error("Usage error: {0}")]
    Usage(String),

    // ========================================================================
    // Parse Errors
    // ========================================================================
    /// The migration does not contain the expected delimiters or payload
    #[error("Malformed migration: {reason}")]
    MalformedMigration { reason: String },

    /// A column declares a type tag that has no TypeScript mapping
    #[error("Unknown type tag '{tag}' for column '{column}'")]
    UnknownTypeTag { column: String, tag: String },

    /// No migration file matches the requested name
    #[error("Migration not found: {0}")]
    MigrationNotFound(PathBuf),

    /// More than one migration file matches the requested name
    #[error("Migration name '{name}' is ambiguous: {}", candidates.join(", "))]
    AmbiguousMigration {
        name: String,
        candidates: Vec<String>,
    },

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// A registry file lacks the block its entries are registered in
    #[error("Registry '{path}' has no '{anchor}' block")]
    RegistryAnchorMissing { path: PathBuf, anchor: String },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Target directory does not exist and creation is disabled
    #[error("Output directory does not exist: {0}")]
    DirectoryMissing(PathBuf),

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Coarse classification of a [`ScaffoldError`], used for exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Parse,
    Io,
    Config,
}

impl ScaffoldError {
    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        ScaffoldError::Usage(msg.into())
    }

    /// Create a malformed-migration error
    pub fn malformed(reason: impl Into<String>) -> Self {
        ScaffoldError::MalformedMigration {
            reason: reason.into(),
        }
    }

    /// Create an unknown-type-tag error
    pub fn unknown_type(column: impl Into<String>, tag: impl Into<String>) -> Self {
        ScaffoldError::UnknownTypeTag {
            column: column.into(),
            tag: tag.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ScaffoldError::InvalidConfig(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        ScaffoldError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScaffoldError::Usage(_) => ErrorKind::Usage,
            ScaffoldError::MalformedMigration { .. }
            | ScaffoldError::UnknownTypeTag { .. }
            | ScaffoldError::MigrationNotFound(_)
            | ScaffoldError::AmbiguousMigration { .. } => ErrorKind::Parse,
            ScaffoldError::InvalidConfig(_) => ErrorKind::Config,
            ScaffoldError::RegistryAnchorMissing { .. }
            | ScaffoldError::Io(_)
            | ScaffoldError::FileRead { .. }
            | ScaffoldError::FileWrite { .. }
            | ScaffoldError::DirectoryMissing(_)
            | ScaffoldError::DirectoryCreate { .. }
            | ScaffoldError::WithContext { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error came from reading the migration
    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }
}

/// Result type alias using ScaffoldError
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> ScaffoldResult<T>;
}

impl<T, E: Into<ScaffoldError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> ScaffoldResult<T> {
        self.map_err(|e| {
            let err: ScaffoldError = e.into();
            ScaffoldError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

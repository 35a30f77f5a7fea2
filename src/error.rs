//! Error types for preference storage and keyboard profiles
//!
//! This module defines the error types used throughout the prefpane library.
//! All fallible public functions return [`Result<T, Error>`]. The view-model
//! operations themselves are total; only parsing, persistence and input
//! validation can fail.

use std::path::PathBuf;

/// Errors that can occur while loading, editing or persisting preferences
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexer error during tokenization
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error during parsing
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Option name not present in the registry
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    /// Value kind does not match the option's declared kind
    #[error("Invalid value for option '{option}': expected {expected}, got {actual}")]
    InvalidOptionValue {
        option: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Write attempted on an option set with lock_pref()
    #[error("Option '{0}' is locked and cannot be changed")]
    LockedOption(&'static str),

    /// Shortcut text that does not describe a key combination
    #[error("Invalid shortcut '{text}': {message}")]
    InvalidShortcut { text: String, message: String },

    /// Keyboard profile not found in the profiles directory
    #[error("Keyboard profile '{name}' not found in {directory}")]
    ProfileNotFound { name: String, directory: PathBuf },

    /// Profile name that cannot be used as a file name
    #[error("Invalid keyboard profile name '{0}'")]
    InvalidProfileName(String),

    /// Keyboard profile file could not be (de)serialized
    #[error("Invalid keyboard profile {path}: {source}")]
    ProfileFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration directory could not be determined or used
    #[error("Configuration directory error: {0}")]
    ConfigHome(String),

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use prefpane::{Result, parse_prefs_js};
///
/// fn count_prefs(content: &str) -> Result<usize> {
///     let entries = parse_prefs_js(content)?;
///     Ok(entries.len())
/// }
/// # assert_eq!(count_prefs(r#"user_pref("a", 1);"#).unwrap(), 1);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the chatview application.
//!
//! The core (store, layout, scrolling, selection) has no fatal errors: out of
//! range requests are `None` or no-ops. Everything that can actually fail
//! lives in the shell and is described here with `thiserror`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all domain-specific failures
//!   - [`InputError`] - Log file/stdin reading failures
//!   - [`ConfigError`] - Configuration file failures
//!   - [`LoggingError`] - Log file subscriber setup failures
//!   - `std::io::Error` - Terminal/TUI rendering failures
//! - [`ParseError`] - Malformed input lines. Non-fatal: the line is logged and
//!   shown as a system message instead.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// Returned from the binary's main logic. Domain errors convert via `From`
/// so `?` composes across layers.
///
/// # Examples
///
/// ```no_run
/// use chatview::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     let _input = open_source()?;
///     Ok(())
/// }
/// # fn open_source() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read input from file or stdin.
    ///
    /// Fatal: the view has nothing to show without a source.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Failed to load configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to install the log file subscriber.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Fatal: the terminal is restored and the error printed to stderr.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading message input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified log file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use chatview::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.log")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.log"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided and stdin is an interactive terminal.
    ///
    /// Recovery: print usage for both invocation modes and exit non-zero.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// The followed file was deleted.
    ///
    /// Recovery: the producer stops; rows already read stay on screen.
    #[error("Followed file was deleted")]
    FileDeleted,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A line that looked like a structured record but could not be decoded.
///
/// Lines that do not start with `{` are never parse errors; they become
/// plain-text messages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The line is not valid JSON.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number in the input.
        line: usize,
        /// Parser message from `serde_json`.
        message: String,
    },

    /// A required field is absent.
    #[error("Missing required field '{field}' at line {line}")]
    MissingField {
        /// 1-based line number in the input.
        line: usize,
        /// Name of the missing key.
        field: &'static str,
    },

    /// The timestamp could not be parsed as RFC 3339.
    #[error("Invalid timestamp '{raw}' at line {line}")]
    InvalidTimestamp {
        /// 1-based line number in the input.
        line: usize,
        /// The offending value, verbatim.
        raw: String,
    },
}

impl ParseError {
    /// Line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidJson { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::InvalidTimestamp { line, .. } => *line,
        }
    }
}

//! Error types for `TenkiConv`

use std::path::PathBuf;

use thiserror::Error;

use crate::formats::script::Violation;

/// The error type for `TenkiConv` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Text could not be represented in Shift-JIS.
    #[error("text in {path} cannot be encoded as Shift-JIS")]
    Encoding {
        /// The file being written.
        path: PathBuf,
    },

    // ==================== Script Parse Errors ====================
    /// A structural rule was violated while parsing or transforming a script.
    #[error("malformed input at line {line}: {message}")]
    MalformedInput {
        /// Zero-based line position.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A section header did not carry a scene identifier.
    #[error("malformed section header at line {line}: {text:?}")]
    MalformedHeader {
        /// Zero-based line position.
        line: usize,
        /// The offending line text.
        text: String,
    },

    /// A speaker line did not match the speaker name pattern.
    #[error("malformed speaker line at line {line}: {text:?}")]
    MalformedSpeaker {
        /// Zero-based line position.
        line: usize,
        /// The offending line text.
        text: String,
    },

    // ==================== Transform Errors ====================
    /// A placeholder key was missing, unknown, or tampered with.
    #[error("corrupt placeholder at line {line}: {message}")]
    CorruptPlaceholder {
        /// Zero-based line position.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The validator found the script and its section records out of sync.
    #[error("structural mismatch: {}", describe_violations(.violations))]
    StructuralMismatch {
        /// Every violation found, in check order.
        violations: Vec<Violation>,
    },

    // ==================== File Set Errors ====================
    /// A required paired file (section records or `.meta` script) is absent.
    #[error("missing companion file: {path}")]
    MissingCompanionFile {
        /// The expected path.
        path: PathBuf,
    },

    /// The translation sheet could not be read.
    #[error("invalid translation sheet (row {row}): {message}")]
    InvalidTranslationSheet {
        /// One-based row number, header included.
        row: usize,
        /// What went wrong.
        message: String,
    },

    /// The file extension does not map to a conversion direction.
    #[error("unsupported file type: {path}")]
    UnsupportedFileType {
        /// The rejected path.
        path: PathBuf,
    },
}

fn describe_violations(violations: &[Violation]) -> String {
    match violations {
        [] => "no violations recorded".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// A specialized Result type for `TenkiConv` operations.
pub type Result<T> = std::result::Result<T, Error>;

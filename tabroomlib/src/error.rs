//! Error types for tabroomlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring a [`Texttable`](crate::Texttable).
///
/// A failed setter leaves the table exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// An array does not match the table's column count (or a border
    /// specification does not hold exactly 4 characters)
    #[error("array should contain {expected} elements, got {found}")]
    Sizing { expected: usize, found: usize },

    /// A column width of zero was requested
    #[error("wrong argument in column width specification: column {column} has width {width}")]
    InvalidWidth { column: usize, width: usize },

    /// Precision must be a non-negative digit count
    #[error("precision must be an integer >= 0, got {0}")]
    InvalidPrecision(i64),

    /// Unrecognized alignment, valign or dtype code
    #[error("invalid {kind} '{value}'")]
    InvalidCode { kind: &'static str, value: String },
}

impl TableError {
    /// True for row/array length mismatches and malformed border specs.
    pub fn is_sizing(&self) -> bool {
        matches!(self, TableError::Sizing { .. })
    }
}

/// Errors that can occur across the summary workflow
#[derive(Error, Debug)]
pub enum TabroomError {
    /// Table configuration failed
    #[error(transparent)]
    Table(#[from] TableError),

    /// No object is stored under the key
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Key cannot be mapped onto the store
    #[error("invalid object key '{key}': {message}")]
    InvalidKey { key: String, message: String },

    /// Failed to read or write a store file
    #[error("failed to access '{path}': {source}")]
    StoreIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Request body failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Generation could not be triggered
    #[error("failed to trigger generation: {0}")]
    Trigger(String),

    /// The summarizer failed for a tournament
    #[error("summarizer failed for tournament {tournament}: {message}")]
    Summarizer { tournament: String, message: String },

    /// Notification could not be delivered
    #[error("notification failed: {0}")]
    Notify(String),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for I/O operations

use crate::bmf::token_name;
use thiserror::Error;

/// Structural problems found while decoding a BMF buffer.
///
/// Offsets are byte offsets into the decoded buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected token {} ({expected:#010x}) at offset {offset}, found {found:#010x}", token_label(.expected))]
    UnexpectedToken { expected: u32, found: u32, offset: usize },

    #[error("buffer ends at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof { offset: usize, needed: usize, available: usize },

    #[error("{section} count mismatch: expected {expected}, found {found}")]
    CountMismatch { section: &'static str, expected: usize, found: usize },

    #[error("group {group} references vertex {index} but only {vertex_count} vertices exist")]
    IndexOutOfRange { group: usize, index: u32, vertex_count: usize },
}

fn token_label(token: &u32) -> &'static str {
    token_name(*token)
}

/// Errors that can occur while loading scan assets
#[derive(Error, Debug)]
pub enum IoError {
    #[error("BMF decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for asset loading
pub type Result<T> = std::result::Result<T, IoError>;

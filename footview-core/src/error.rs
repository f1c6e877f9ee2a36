//! Error types for footview

use thiserror::Error;

/// Main error type for footview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Missing measurement description: {key}")]
    MissingDescription { key: String },

    #[error("Measurement description {key} has no marker named {marker}")]
    MissingMarker { key: String, marker: String },

    #[error("Unsupported measurement type: {0}")]
    UnsupportedMeasurement(String),

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),
}

/// Result type alias for footview operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the render engine

use thiserror::Error;

/// Errors raised while building or driving a view
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Asset error: {0}")]
    Asset(#[from] footview_io::IoError),

    #[error(transparent)]
    Core(#[from] footview_core::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unknown camera view: {0}")]
    UnknownView(String),
}

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
